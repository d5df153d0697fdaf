pub mod gst_calculator;
