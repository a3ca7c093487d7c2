mod wash_service;

pub use wash_service::{
    CreateWashServiceRequest, NewWashService, UpdateWashServiceRequest, WashService,
};
