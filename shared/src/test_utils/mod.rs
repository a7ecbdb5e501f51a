pub mod mock_api;
pub mod mock_pending_store;
pub mod test_logging;
