pub mod data;
pub mod ev_calculator;
pub mod oracle;
