#![no_std]

pub mod policy {
    pub mod interface;
    pub mod types;
}
