pub mod checkout;
pub mod status_poller;
