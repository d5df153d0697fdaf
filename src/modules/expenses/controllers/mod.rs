pub mod expense_controller;
