pub mod insight_controller;
