pub mod employee_filter;
