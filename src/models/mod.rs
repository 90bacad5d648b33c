pub mod claim;
pub mod contact;
pub mod event;
pub mod favorite;
pub mod location;
pub mod organizer;
pub mod purchase;
pub mod rating;
pub mod report;
pub mod role;
pub mod ticket;
pub mod user;
pub mod verifier;

pub use claim::{Claim, ClaimPatch, NewClaim};
pub use contact::{ContactMessage, ContactPatch, NewContactMessage};
pub use event::{Event, EventFilter, EventPatch, EventVerifier, NewEvent, NewEventVerifier};
pub use favorite::{Favorite, NewFavorite};
pub use location::{Category, Department, District, Province};
pub use organizer::{NewOrganizer, Organizer, OrganizerPatch};
pub use purchase::{NewPurchase, NewPurchaseDetail, Purchase, PurchaseDetail, PurchaseFilter};
pub use rating::{NewRating, Rating, RatingFilter};
pub use report::{NewReport, Report, ReportPatch};
pub use role::Role;
pub use ticket::{NewTicketType, Ticket, TicketFilter, TicketPatch, TicketStatus, TicketType, TicketTypePatch};
pub use user::{NewUser, User, UserPatch};
pub use verifier::{NewVerifier, Verifier, VerifierPatch};
