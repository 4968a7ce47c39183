//! Receipt Helpers (spec §4.7): decode every recognizable log in a batch,
//! skipping logs whose `topics[0]` names no known event. Logs are
//! independent — one log's decode failure never aborts the batch.
//!
//! Grounded on the teacher's `chaincodec-registry` batch-lookup path and its
//! `rayon`-parallel `ChainDecoder::decode_batch`, generalized from per-chain
//! dispatch to per-topic dispatch against a single [`InterfaceRegistry`].

use rayon::prelude::*;

use abicodec_vm::DecodedLog;

use crate::interface::InterfaceRegistry;

/// One log entry as read off a transaction receipt, independent of any
/// particular chain client's representation.
#[derive(Debug, Clone)]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
    pub log_index: u64,
}

/// A successfully decoded log, annotated with the metadata the receipt
/// carried alongside it.
#[derive(Debug, Clone)]
pub struct DecodedLogRecord {
    pub address: String,
    pub log_index: u64,
    pub decoded: DecodedLog,
}

/// Decode every log in `logs` whose `topics[0]` matches a known event.
/// Unrecognized and malformed logs are dropped silently — callers auditing
/// an entire receipt want the subset they can interpret, not a hard failure
/// on the first log from a contract this registry doesn't describe.
pub fn decode_receipt_logs(registry: &InterfaceRegistry, logs: &[RawLog]) -> Vec<DecodedLogRecord> {
    logs.par_iter().filter_map(|log| decode_one(registry, log)).collect()
}

/// As [`decode_receipt_logs`], but restricted to logs whose decoded event
/// name equals `name`. A linear scan over the already-decoded batch, not a
/// registry index — event names are not assumed unique across a document.
pub fn decode_receipt_logs_by_name(registry: &InterfaceRegistry, logs: &[RawLog], name: &str) -> Vec<DecodedLogRecord> {
    decode_receipt_logs(registry, logs)
        .into_iter()
        .filter(|record| record.decoded.name == name)
        .collect()
}

fn decode_one(registry: &InterfaceRegistry, log: &RawLog) -> Option<DecodedLogRecord> {
    let topic0 = log.topics.first()?;
    let event = registry.event_by_topic(topic0).ok()?;
    let decoded = abicodec_vm::decode_log(event, &log.data, &log.topics).ok()?;
    Some(DecodedLogRecord {
        address: log.address.clone(),
        log_index: log.log_index,
        decoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::InterfaceRegistry;

    const ERC20_DOC: &str = r#"[
        {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]},
        {"type":"event","name":"Approval","inputs":[{"name":"owner","type":"address","indexed":true},{"name":"spender","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]}
    ]"#;

    fn transfer_log(registry: &InterfaceRegistry, log_index: u64) -> RawLog {
        let topic0 = registry.event_topic("Transfer").unwrap();
        let mut data = vec![0u8; 32];
        data[31] = 9;
        RawLog {
            address: "0xcontract".to_string(),
            topics: vec![topic0, [0x11; 32], [0x22; 32]],
            data,
            log_index,
        }
    }

    #[test]
    fn decodes_known_logs_and_skips_unknown() {
        let registry = InterfaceRegistry::from_document(ERC20_DOC).unwrap();
        let logs = vec![
            transfer_log(&registry, 0),
            RawLog {
                address: "0xother".to_string(),
                topics: vec![[0xff; 32]],
                data: vec![],
                log_index: 1,
            },
        ];
        let mut decoded = decode_receipt_logs(&registry, &logs);
        decoded.sort_by_key(|r| r.log_index);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].decoded.name, "Transfer");
        assert_eq!(decoded[0].log_index, 0);
    }

    #[test]
    fn logs_with_no_topics_are_skipped_not_errored() {
        let registry = InterfaceRegistry::from_document(ERC20_DOC).unwrap();
        let logs = vec![RawLog {
            address: "0xanon".to_string(),
            topics: vec![],
            data: vec![],
            log_index: 0,
        }];
        assert!(decode_receipt_logs(&registry, &logs).is_empty());
    }

    #[test]
    fn filter_by_name_is_a_linear_scan_over_decoded_batch() {
        let registry = InterfaceRegistry::from_document(ERC20_DOC).unwrap();
        let logs = vec![transfer_log(&registry, 0), transfer_log(&registry, 1)];
        let decoded = decode_receipt_logs_by_name(&registry, &logs, "Transfer");
        assert_eq!(decoded.len(), 2);
        assert!(decode_receipt_logs_by_name(&registry, &logs, "Approval").is_empty());
    }
}
