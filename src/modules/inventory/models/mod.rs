pub mod stock_delta;

pub use stock_delta::StockDelta;
