//! Item kinds and the concrete items they resolve to.
//!
//! An `ItemKind` is either a fixed definition or a generator that
//! synthesizes a concrete item from party state. Dispatch is by
//! pattern match on the variant, never by inspecting the item.

use crate::types::{PokemonType, Tier};
use serde::{Deserialize, Serialize};

/// Broad behaviour class. Held and form-change items are never capped
/// by run-wide stack limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    Global,
    PokemonTargeted,
    HeldItem,
    FormChange,
    EnemyBuff,
}

impl ItemClass {
    pub fn ignores_stack_cap(self) -> bool {
        matches!(self, ItemClass::HeldItem | ItemClass::FormChange)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseStat {
    Hp,
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
}

impl BaseStat {
    pub const ALL: [BaseStat; 6] = [
        BaseStat::Hp,
        BaseStat::Attack,
        BaseStat::Defense,
        BaseStat::SpAtk,
        BaseStat::SpDef,
        BaseStat::Speed,
    ];

    /// Vitamin that raises this stat.
    pub fn vitamin(self) -> &'static str {
        match self {
            BaseStat::Hp => "HP Up",
            BaseStat::Attack => "Protein",
            BaseStat::Defense => "Iron",
            BaseStat::SpAtk => "Calcium",
            BaseStat::SpDef => "Zinc",
            BaseStat::Speed => "Carbos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempStat {
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
    Accuracy,
}

impl TempStat {
    pub const ALL: [TempStat; 6] = [
        TempStat::Attack,
        TempStat::Defense,
        TempStat::SpAtk,
        TempStat::SpDef,
        TempStat::Speed,
        TempStat::Accuracy,
    ];

    pub fn item_name(self) -> &'static str {
        match self {
            TempStat::Attack => "X Attack",
            TempStat::Defense => "X Defense",
            TempStat::SpAtk => "X Sp. Atk",
            TempStat::SpDef => "X Sp. Def",
            TempStat::Speed => "X Speed",
            TempStat::Accuracy => "X Accuracy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesBooster {
    LightBall,
    ThickClub,
    MetalPowder,
    QuickPowder,
}

impl SpeciesBooster {
    pub const ALL: [SpeciesBooster; 4] = [
        SpeciesBooster::LightBall,
        SpeciesBooster::ThickClub,
        SpeciesBooster::MetalPowder,
        SpeciesBooster::QuickPowder,
    ];

    /// Species that benefit from the item.
    pub fn species(self) -> &'static [u32] {
        match self {
            SpeciesBooster::LightBall => &[25],
            SpeciesBooster::ThickClub => &[104, 105, 2105],
            SpeciesBooster::MetalPowder | SpeciesBooster::QuickPowder => &[132],
        }
    }

    /// Id under which a battler holds the item.
    pub fn held_id(self) -> &'static str {
        match self {
            SpeciesBooster::LightBall => "LIGHT_BALL",
            SpeciesBooster::ThickClub => "THICK_CLUB",
            SpeciesBooster::MetalPowder => "METAL_POWDER",
            SpeciesBooster::QuickPowder => "QUICK_POWDER",
        }
    }

    pub fn item_name(self) -> &'static str {
        match self {
            SpeciesBooster::LightBall => "Light Ball",
            SpeciesBooster::ThickClub => "Thick Club",
            SpeciesBooster::MetalPowder => "Metal Powder",
            SpeciesBooster::QuickPowder => "Quick Powder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BerryType {
    Sitrus,
    Lum,
    Enigma,
    Liechi,
    Ganlon,
    Petaya,
    Apicot,
    Salac,
    Lansat,
    Starf,
    Leppa,
}

impl BerryType {
    pub fn name(self) -> &'static str {
        match self {
            BerryType::Sitrus => "Sitrus",
            BerryType::Lum => "Lum",
            BerryType::Enigma => "Enigma",
            BerryType::Liechi => "Liechi",
            BerryType::Ganlon => "Ganlon",
            BerryType::Petaya => "Petaya",
            BerryType::Apicot => "Apicot",
            BerryType::Salac => "Salac",
            BerryType::Lansat => "Lansat",
            BerryType::Starf => "Starf",
            BerryType::Leppa => "Leppa",
        }
    }
}

pub const NATURES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty", "Bold", "Docile", "Relaxed", "Impish", "Lax",
    "Timid", "Hasty", "Serious", "Jolly", "Naive", "Modest", "Mild", "Quiet", "Bashful", "Rash",
    "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

fn attack_booster_name(t: PokemonType) -> &'static str {
    match t {
        PokemonType::Normal => "Silk Scarf",
        PokemonType::Fighting => "Black Belt",
        PokemonType::Flying => "Sharp Beak",
        PokemonType::Poison => "Poison Barb",
        PokemonType::Ground => "Soft Sand",
        PokemonType::Rock => "Hard Stone",
        PokemonType::Bug => "Silver Powder",
        PokemonType::Ghost => "Spell Tag",
        PokemonType::Steel => "Metal Coat",
        PokemonType::Fire => "Charcoal",
        PokemonType::Water => "Mystic Water",
        PokemonType::Grass => "Miracle Seed",
        PokemonType::Electric => "Magnet",
        PokemonType::Psychic => "Twisted Spoon",
        PokemonType::Ice => "Never-Melt Ice",
        PokemonType::Dragon => "Dragon Fang",
        PokemonType::Dark => "Black Glasses",
        PokemonType::Fairy => "Fairy Feather",
        PokemonType::Stellar => "Stellar Plate",
    }
}

/// The parameters a generator picked, or that a caller pins up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ItemVariant {
    AttackType { move_type: PokemonType },
    BaseStat { stat: BaseStat },
    TempStat { stat: TempStat },
    SpeciesBooster { item: SpeciesBooster },
    Tm { move_id: u32, name: String, tier: Tier },
    Evolution { item_id: u32, name: String },
    FormChange { item_id: u32, name: String },
    Mint { nature: u8 },
    TeraShard { tera_type: PokemonType },
    Berry { berry: BerryType },
}

impl ItemVariant {
    pub fn display_name(&self) -> String {
        match self {
            ItemVariant::AttackType { move_type } => attack_booster_name(*move_type).to_string(),
            ItemVariant::BaseStat { stat } => stat.vitamin().to_string(),
            ItemVariant::TempStat { stat } => stat.item_name().to_string(),
            ItemVariant::SpeciesBooster { item } => item.item_name().to_string(),
            ItemVariant::Tm { name, .. } => format!("TM {name}"),
            ItemVariant::Evolution { name, .. } | ItemVariant::FormChange { name, .. } => name.clone(),
            ItemVariant::Mint { nature } => {
                let nature = NATURES.get(*nature as usize).copied().unwrap_or("Unknown");
                format!("{nature} Mint")
            }
            ItemVariant::TeraShard { tera_type } => format!("{} Tera Shard", tera_type.name()),
            ItemVariant::Berry { berry } => format!("{} Berry", berry.name()),
        }
    }
}

/// A fully resolved reward item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteItem {
    /// Id of the kind that produced it.
    pub id: String,
    pub name: String,
    pub group: Option<String>,
    pub class: ItemClass,
    #[serde(default)]
    pub variant: Option<ItemVariant>,
}

impl ConcreteItem {
    pub fn fixed(id: &str, name: &str, group: Option<&str>, class: ItemClass) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            group: group.map(str::to_string),
            class,
            variant: None,
        }
    }

    /// Same display name, or both carry the same group.
    pub fn collides_with(&self, other: &ConcreteItem) -> bool {
        self.name == other.name || (self.group.is_some() && self.group == other.group)
    }
}

/// Party-driven item families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    AttackTypeBooster,
    BaseStatBooster,
    TempStatBooster,
    SpeciesStatBooster,
    Tm(Tier),
    EvolutionItem { rare: bool },
    FormChangeItem { rare: bool },
    Mint,
    TeraShard,
    Berry,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Fixed(ConcreteItem),
    Generator {
        id: &'static str,
        name: &'static str,
        group: Option<&'static str>,
        class: ItemClass,
        generator: Generator,
    },
}

impl ItemKind {
    pub fn fixed(id: &str, name: &str, group: Option<&str>, class: ItemClass) -> Self {
        ItemKind::Fixed(ConcreteItem::fixed(id, name, group, class))
    }

    pub fn id(&self) -> &str {
        match self {
            ItemKind::Fixed(item) => &item.id,
            ItemKind::Generator { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ItemKind::Fixed(item) => &item.name,
            ItemKind::Generator { name, .. } => name,
        }
    }

    pub fn class(&self) -> ItemClass {
        match self {
            ItemKind::Fixed(item) => item.class,
            ItemKind::Generator { class, .. } => *class,
        }
    }

    pub fn generator(&self) -> Option<Generator> {
        match self {
            ItemKind::Fixed(_) => None,
            ItemKind::Generator { generator, .. } => Some(*generator),
        }
    }

    /// Wrap a generated variant as this kind's concrete item.
    pub(crate) fn materialize(&self, variant: ItemVariant) -> ConcreteItem {
        match self {
            ItemKind::Fixed(item) => item.clone(),
            ItemKind::Generator { id, group, class, .. } => ConcreteItem {
                id: id.to_string(),
                name: variant.display_name(),
                group: group.map(str::to_string),
                class: *class,
                variant: Some(variant),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_groups_never_collide() {
        let a = ConcreteItem::fixed("RARE_CANDY", "Rare Candy", None, ItemClass::PokemonTargeted);
        let b = ConcreteItem::fixed("DIRE_HIT", "Dire Hit", None, ItemClass::Global);
        assert!(!a.collides_with(&b));
    }

    #[test]
    fn shared_group_collides() {
        let a = ConcreteItem::fixed("POKEBALL", "Poké Ball", Some("pb"), ItemClass::Global);
        let b = ConcreteItem::fixed("GREAT_BALL", "Great Ball", Some("pb"), ItemClass::Global);
        assert!(a.collides_with(&b));
    }

    #[test]
    fn generated_names_come_from_the_variant() {
        assert_eq!(ItemVariant::AttackType { move_type: PokemonType::Fire }.display_name(), "Charcoal");
        assert_eq!(ItemVariant::Mint { nature: 3 }.display_name(), "Adamant Mint");
        assert_eq!(ItemVariant::Berry { berry: BerryType::Lum }.display_name(), "Lum Berry");
    }
}
