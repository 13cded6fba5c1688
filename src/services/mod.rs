pub mod analysis_service;
pub mod classifier_service;
pub mod portfolio_service;
pub mod sanitizer;
