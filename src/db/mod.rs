pub mod portfolio_queries;
