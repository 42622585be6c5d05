pub mod domain;
pub mod ports;

pub use domain::{
    Category, Curiosity, DateOfNote, Device, EmailAddress, Image, NewSentEmail, NewUser,
    OutboundEmail, Post, RecordId, SendOutcome, SentEmail, Subscriber, UpdateOutcome, User,
    UserUpdate, STATUS_ACTIVE, STATUS_SUSPENDED,
};
pub use ports::{DatabaseService, MailService, PortError, PortResult};
