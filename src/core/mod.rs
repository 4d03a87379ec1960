pub mod registration;

pub use crate::domain::model::{
    FieldError, Gender, NewRegistrant, Order, Payment, Registrant, RegistrantDetails,
    RegistrationFields, VerificationFields,
};
pub use crate::domain::ports::{ConfigProvider, PaymentGateway, RegistrantStore};
pub use crate::utils::error::{RegistrationError, Result};
pub use registration::RegistrationService;
