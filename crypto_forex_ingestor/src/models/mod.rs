pub mod bar;
pub mod catalog;
pub mod instrument;
pub mod request_params;
pub mod timespan;
