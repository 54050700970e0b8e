pub mod jsonl_log_store;
