pub mod orange_money;
