mod select_link_config;

pub use select_link_config::SelectLinkConfig;
