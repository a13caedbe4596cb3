//! Fixed instruction and output schema sent with every extraction request.

use ledgerlift_core::BankIdentity;
use serde_json::{json, Value};

pub const SYSTEM_INSTRUCTION: &str = r#"
You are a specialized financial data extraction assistant. Your task is to extract bank transaction data from uploaded bank statement documents (PDF or Image).
The supported banks are: Banco Popular de Puerto Rico, FirstBank Puerto Rico, and Oriental Bank.

Analyze the document and extract the following:
1. Identify the Bank Name (Popular, FirstBank, or Oriental).
2. Extract all transactions into a structured list.

For each transaction, extract:
- Date: Format YYYY-MM-DD. If the year is not explicitly on the row, infer it from the statement period header. If ambiguous, use the current year.
- Description: Extract ONLY the vendor name, payee, or payer. REMOVE all non-essential text such as:
    - Transaction codes (e.g., POS, ACH, DEBIT, W/D, CHECK)
    - Dates within the description
    - Store numbers, IDs, or reference codes (e.g., #1234, ID:54321, 555-555-5555)
    - Location codes (e.g., SJU, NY, PR) unless part of the brand name
    Example: "DEBIT CARD PURCHASE WALMART #2342 SAN JUAN PR" -> "Walmart"
    Example: "ATH MOVIL TRANSFER TO 787xxx" -> "ATH Movil Transfer"
- Amount: The absolute numerical value of the transaction.
- Type: 'DEBIT' for withdrawals, payments, fees, checks. 'CREDIT' for deposits, interest, refunds.
- Reference: Any check number or reference ID associated with the line item. Null if not found.

Rules:
- Ignore headers, footers, page numbers, and summary balances.
- Only extract the line-item transactions.
- Handle multi-line descriptions by combining them before cleaning.
- If there are multiple sections (e.g., "Electronic Withdrawals", "Checks Paid"), combine them all into one list.
"#;

pub const USER_PROMPT: &str =
    "Extract all bank transactions from this document. Return the data in JSON format.";

/// Structured-output schema: one bank name plus a flat transaction list.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "bankName": {
                "type": "STRING",
                "enum": BankIdentity::schema_names(),
                "description": "The name of the bank identified in the statement."
            },
            "transactions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": { "type": "STRING", "description": "Transaction date in YYYY-MM-DD" },
                        "description": { "type": "STRING", "description": "Cleaned vendor/payee name only" },
                        "amount": { "type": "NUMBER", "description": "Absolute amount of the transaction" },
                        "type": { "type": "STRING", "enum": ["DEBIT", "CREDIT"], "description": "Type of transaction" },
                        "reference": { "type": "STRING", "description": "Check number or reference code", "nullable": true }
                    },
                    "required": ["date", "description", "amount", "type"]
                }
            }
        },
        "required": ["bankName", "transactions"]
    })
}
