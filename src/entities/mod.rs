pub mod vacancy;

pub use vacancy::Entity as Vacancies;
