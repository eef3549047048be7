pub mod aggregate;
pub mod football_data;
pub mod http_client;
pub mod margin;
pub mod normalize;
pub mod odds_api;
pub mod persist;
pub mod pipeline;
pub mod record;
pub mod sample;
pub mod simulate;
pub mod source;
pub mod team_stats;
pub mod time_window;
