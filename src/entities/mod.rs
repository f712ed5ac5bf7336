// Entity Models - the extracted bill data model
//
// One extraction pass builds one BillDocument that owns everything below it.
// Cross-entity references use natural keys (section number, proviso key),
// never pointers, so the whole graph serializes as plain data.

pub mod action;
pub mod appropriation;
pub mod bill;
pub mod definition;
pub mod enrollment;
pub mod program;
pub mod proviso;
pub mod statute;
pub mod veto;

pub use action::{ActionEntry, LegislativeAction};
pub use appropriation::{Agency, Appropriation, ChangeType};
pub use bill::{BillDocument, Part, Section};
pub use definition::Definition;
pub use enrollment::{Certificate, Chamber, Enrollment, VoteRecord};
pub use program::{Program, ProgramKind};
pub use proviso::{Condition, Proviso, ProvisoKey, ProvisoLink};
pub use statute::{ReferenceKind, StatutoryReference};
pub use veto::{Veto, VetoStatus, VetoType};
