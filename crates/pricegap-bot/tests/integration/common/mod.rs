pub mod mock_transport;
pub mod recording_sink;
