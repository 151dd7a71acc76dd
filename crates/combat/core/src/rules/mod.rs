//! Rules vocabulary shared by the resolvers: abilities, proficiency tiers,
//! conditions and damage types.
mod ability;
mod condition;
mod damage_type;

pub use ability::{Ability, ProficiencyTier};
pub use condition::{Condition, ConditionSet};
pub use damage_type::{DamageModifierKind, DamageTraits, DamageType, DamageTypeSet};
