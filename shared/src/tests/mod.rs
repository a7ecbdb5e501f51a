pub mod mock_api_tests;
