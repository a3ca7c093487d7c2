mod appointment;

pub use appointment::{
    parse_appointment_time, Appointment, AppointmentQuery, AppointmentStatus,
    CreateAppointmentRequest, NewAppointment, UpdateAppointmentRequest,
};
