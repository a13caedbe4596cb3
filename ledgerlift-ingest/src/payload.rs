//! Decode the service's JSON text into an `ExtractionResult`.
//!
//! Expected shape:
//!   { "bankName": "...", "transactions": [ { "date", "description", "amount", "type", "reference"? } ] }

use chrono::NaiveDate;
use ledgerlift_core::{BankIdentity, ExtractionResult, Transaction, TransactionType};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ExtractionError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    bank_name: String,
    transactions: Vec<RawTransaction>,
}

#[derive(Deserialize)]
struct RawTransaction {
    date: String,
    description: String,
    amount: f64,
    #[serde(rename = "type")]
    kind: TransactionType,
    #[serde(default)]
    reference: Option<String>,
}

/// Parse and validate a payload. The pretty-printed JSON is kept as raw text.
pub fn decode_payload(text: &str) -> Result<ExtractionResult, ExtractionError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ExtractionError::MalformedPayload(format!("invalid JSON: {e}")))?;
    let raw_text = serde_json::to_string_pretty(&value)
        .map_err(|e| ExtractionError::MalformedPayload(e.to_string()))?;
    let payload: RawPayload = serde_json::from_value(value)
        .map_err(|e| ExtractionError::MalformedPayload(e.to_string()))?;

    let mut transactions = Vec::with_capacity(payload.transactions.len());
    for (i, raw) in payload.transactions.into_iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|_| {
            ExtractionError::MalformedPayload(format!(
                "transaction {}: invalid date {:?}",
                i + 1,
                raw.date
            ))
        })?;

        if raw.amount < 0.0 {
            tracing::debug!(index = i, amount = raw.amount, "negative amount normalized");
        }

        let mut txn = Transaction::new(date, raw.description.trim(), raw.amount, raw.kind);
        txn.reference = raw
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        transactions.push(txn);
    }

    let bank = BankIdentity::from_bank_name(&payload.bank_name);
    Ok(ExtractionResult::new(bank, transactions).with_raw_text(raw_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "bankName": "Banco Popular",
        "transactions": [
            {"date": "2025-01-03", "description": "Walmart", "amount": 54.21, "type": "DEBIT", "reference": null},
            {"date": "2025-01-05", "description": " Payroll ", "amount": 1500, "type": "CREDIT"},
            {"date": "2025-01-09", "description": "Check", "amount": 120.0, "type": "DEBIT", "reference": "1043"}
        ]
    }"#;

    #[test]
    fn test_decodes_sample() {
        let r = decode_payload(SAMPLE).unwrap();
        assert_eq!(r.bank, BankIdentity::Popular);
        assert_eq!(r.transactions.len(), 3);

        let first = &r.transactions[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(first.kind, TransactionType::Debit);
        assert_eq!(first.reference, None);

        assert_eq!(r.transactions[1].description, "Payroll");
        assert_eq!(r.transactions[1].amount, 1500.0);
        assert_eq!(r.transactions[2].reference.as_deref(), Some("1043"));
        assert!(r.raw_text.as_deref().unwrap().contains("\"bankName\""));
    }

    #[test]
    fn test_keeps_extraction_order() {
        let r = decode_payload(SAMPLE).unwrap();
        let names: Vec<_> = r.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["Walmart", "Payroll", "Check"]);
    }

    #[test]
    fn test_negative_amount_is_made_absolute() {
        let text = r#"{"bankName":"FirstBank","transactions":[
            {"date":"2025-02-01","description":"Fee","amount":-3.5,"type":"DEBIT"}]}"#;
        let r = decode_payload(text).unwrap();
        assert_eq!(r.bank, BankIdentity::FirstBank);
        assert_eq!(r.transactions[0].amount, 3.5);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let cases = [
            "not json",
            "[]",
            r#"{"transactions": []}"#,
            r#"{"bankName": "Oriental Bank"}"#,
            r#"{"bankName": "Oriental Bank", "transactions": [{"date":"2025-01-01","description":"x","amount":1,"type":"REFUND"}]}"#,
            r#"{"bankName": "Oriental Bank", "transactions": [{"date":"2025-01-01","description":"x","amount":"1","type":"DEBIT"}]}"#,
            r#"{"bankName": "Oriental Bank", "transactions": [{"date":"01/02/2025","description":"x","amount":1,"type":"DEBIT"}]}"#,
        ];
        for c in cases {
            let err = decode_payload(c).unwrap_err();
            assert!(
                matches!(err, ExtractionError::MalformedPayload(_)),
                "expected malformed payload for {c}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_bank_name() {
        let r = decode_payload(r#"{"bankName":"Unknown Bank","transactions":[]}"#).unwrap();
        assert_eq!(r.bank, BankIdentity::Unknown);
        assert!(r.transactions.is_empty());
    }
}
