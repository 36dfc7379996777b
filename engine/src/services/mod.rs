// Services bound to a StoreSettings value.

pub mod dataset_service;

pub use dataset_service::DatasetService;
