pub mod report;

pub use report::{
    BusinessReport, DescriptionRequest, DescriptionResponse, ExtractedLineItem,
    InventoryForecast, InvoiceImageRequest, PredictedSales, RestockRecommendation,
    TopSellingProduct,
};
