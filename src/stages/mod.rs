mod abandonment;
mod births;
mod bookkeeping;
mod density;
mod maturation;
mod mortality;
mod seasonal;
mod sterilization;

pub use abandonment::AbandonmentStage;
pub use births::{environment_factor, BirthStage};
pub use bookkeeping::BookkeepingStage;
pub use density::{density_pressure, pressured_death_probability, DensityStage};
pub use maturation::MaturationStage;
pub use mortality::{cause_shares, monthly_survival, MortalityStage};
pub use seasonal::{calendar_month, seasonal_factor, SeasonalStage};
pub use sterilization::SterilizationStage;
