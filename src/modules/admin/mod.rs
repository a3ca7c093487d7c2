// Admin module: credential check used by the back-office login prompt

pub mod controllers;
