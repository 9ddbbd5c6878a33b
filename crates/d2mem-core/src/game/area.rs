use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr, IntoStaticStr};

/// Level (zone) ids as stored in `Level.LevelId`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[repr(u32)]
pub enum Area {
    /// No area; seen while loading or between games
    #[default]
    None = 0,
    // Act 1
    #[strum(serialize = "Rogue Encampment")]
    RogueEncampment = 1,
    #[strum(serialize = "Blood Moor")]
    BloodMoor = 2,
    #[strum(serialize = "Cold Plains")]
    ColdPlains = 3,
    #[strum(serialize = "Stony Field")]
    StonyField = 4,
    #[strum(serialize = "Dark Wood")]
    DarkWood = 5,
    #[strum(serialize = "Black Marsh")]
    BlackMarsh = 6,
    #[strum(serialize = "Tamoe Highland")]
    TamoeHighland = 7,
    #[strum(serialize = "Den of Evil")]
    DenOfEvil = 8,
    #[strum(serialize = "Cave Level 1")]
    CaveLevel1 = 9,
    #[strum(serialize = "Underground Passage Level 1")]
    UndergroundPassageLevel1 = 10,
    #[strum(serialize = "Hole Level 1")]
    HoleLevel1 = 11,
    #[strum(serialize = "Pit Level 1")]
    PitLevel1 = 12,
    #[strum(serialize = "Cave Level 2")]
    CaveLevel2 = 13,
    #[strum(serialize = "Underground Passage Level 2")]
    UndergroundPassageLevel2 = 14,
    #[strum(serialize = "Hole Level 2")]
    HoleLevel2 = 15,
    #[strum(serialize = "Pit Level 2")]
    PitLevel2 = 16,
    #[strum(serialize = "Burial Grounds")]
    BurialGrounds = 17,
    #[strum(serialize = "Crypt")]
    Crypt = 18,
    #[strum(serialize = "Mausoleum")]
    Mausoleum = 19,
    #[strum(serialize = "Forgotten Tower")]
    ForgottenTower = 20,
    #[strum(serialize = "Tower Cellar Level 1")]
    TowerCellarLevel1 = 21,
    #[strum(serialize = "Tower Cellar Level 2")]
    TowerCellarLevel2 = 22,
    #[strum(serialize = "Tower Cellar Level 3")]
    TowerCellarLevel3 = 23,
    #[strum(serialize = "Tower Cellar Level 4")]
    TowerCellarLevel4 = 24,
    #[strum(serialize = "Tower Cellar Level 5")]
    TowerCellarLevel5 = 25,
    #[strum(serialize = "Monastery Gate")]
    MonasteryGate = 26,
    #[strum(serialize = "Outer Cloister")]
    OuterCloister = 27,
    #[strum(serialize = "Barracks")]
    Barracks = 28,
    #[strum(serialize = "Jail Level 1")]
    JailLevel1 = 29,
    #[strum(serialize = "Jail Level 2")]
    JailLevel2 = 30,
    #[strum(serialize = "Jail Level 3")]
    JailLevel3 = 31,
    #[strum(serialize = "Inner Cloister")]
    InnerCloister = 32,
    #[strum(serialize = "Cathedral")]
    Cathedral = 33,
    #[strum(serialize = "Catacombs Level 1")]
    CatacombsLevel1 = 34,
    #[strum(serialize = "Catacombs Level 2")]
    CatacombsLevel2 = 35,
    #[strum(serialize = "Catacombs Level 3")]
    CatacombsLevel3 = 36,
    #[strum(serialize = "Catacombs Level 4")]
    CatacombsLevel4 = 37,
    #[strum(serialize = "Tristram")]
    Tristram = 38,
    #[strum(serialize = "Moo Moo Farm")]
    MooMooFarm = 39,
    // Act 2
    #[strum(serialize = "Lut Gholein")]
    LutGholein = 40,
    #[strum(serialize = "Rocky Waste")]
    RockyWaste = 41,
    #[strum(serialize = "Dry Hills")]
    DryHills = 42,
    #[strum(serialize = "Far Oasis")]
    FarOasis = 43,
    #[strum(serialize = "Lost City")]
    LostCity = 44,
    #[strum(serialize = "Valley of Snakes")]
    ValleyOfSnakes = 45,
    #[strum(serialize = "Canyon of the Magi")]
    CanyonOfTheMagi = 46,
    #[strum(serialize = "Sewers Level 1")]
    SewersLevel1Act2 = 47,
    #[strum(serialize = "Sewers Level 2")]
    SewersLevel2Act2 = 48,
    #[strum(serialize = "Sewers Level 3")]
    SewersLevel3Act2 = 49,
    #[strum(serialize = "Harem Level 1")]
    HaremLevel1 = 50,
    #[strum(serialize = "Harem Level 2")]
    HaremLevel2 = 51,
    #[strum(serialize = "Palace Cellar Level 1")]
    PalaceCellarLevel1 = 52,
    #[strum(serialize = "Palace Cellar Level 2")]
    PalaceCellarLevel2 = 53,
    #[strum(serialize = "Palace Cellar Level 3")]
    PalaceCellarLevel3 = 54,
    #[strum(serialize = "Stony Tomb Level 1")]
    StonyTombLevel1 = 55,
    #[strum(serialize = "Halls of the Dead Level 1")]
    HallsOfTheDeadLevel1 = 56,
    #[strum(serialize = "Halls of the Dead Level 2")]
    HallsOfTheDeadLevel2 = 57,
    #[strum(serialize = "Claw Viper Temple Level 1")]
    ClawViperTempleLevel1 = 58,
    #[strum(serialize = "Stony Tomb Level 2")]
    StonyTombLevel2 = 59,
    #[strum(serialize = "Halls of the Dead Level 3")]
    HallsOfTheDeadLevel3 = 60,
    #[strum(serialize = "Claw Viper Temple Level 2")]
    ClawViperTempleLevel2 = 61,
    #[strum(serialize = "Maggot Lair Level 1")]
    MaggotLairLevel1 = 62,
    #[strum(serialize = "Maggot Lair Level 2")]
    MaggotLairLevel2 = 63,
    #[strum(serialize = "Maggot Lair Level 3")]
    MaggotLairLevel3 = 64,
    #[strum(serialize = "Ancient Tunnels")]
    AncientTunnels = 65,
    #[strum(serialize = "Tal Rasha's Tomb 1")]
    TalRashasTomb1 = 66,
    #[strum(serialize = "Tal Rasha's Tomb 2")]
    TalRashasTomb2 = 67,
    #[strum(serialize = "Tal Rasha's Tomb 3")]
    TalRashasTomb3 = 68,
    #[strum(serialize = "Tal Rasha's Tomb 4")]
    TalRashasTomb4 = 69,
    #[strum(serialize = "Tal Rasha's Tomb 5")]
    TalRashasTomb5 = 70,
    #[strum(serialize = "Tal Rasha's Tomb 6")]
    TalRashasTomb6 = 71,
    #[strum(serialize = "Tal Rasha's Tomb 7")]
    TalRashasTomb7 = 72,
    #[strum(serialize = "Duriel's Lair")]
    DurielsLair = 73,
    #[strum(serialize = "Arcane Sanctuary")]
    ArcaneSanctuary = 74,
    // Act 3
    #[strum(serialize = "Kurast Docks")]
    KurastDocks = 75,
    #[strum(serialize = "Spider Forest")]
    SpiderForest = 76,
    #[strum(serialize = "Great Marsh")]
    GreatMarsh = 77,
    #[strum(serialize = "Flayer Jungle")]
    FlayerJungle = 78,
    #[strum(serialize = "Lower Kurast")]
    LowerKurast = 79,
    #[strum(serialize = "Kurast Bazaar")]
    KurastBazaar = 80,
    #[strum(serialize = "Upper Kurast")]
    UpperKurast = 81,
    #[strum(serialize = "Kurast Causeway")]
    KurastCauseway = 82,
    #[strum(serialize = "Travincal")]
    Travincal = 83,
    #[strum(serialize = "Arachnid Lair")]
    ArachnidLair = 84,
    #[strum(serialize = "Spider Cavern")]
    SpiderCavern = 85,
    #[strum(serialize = "Swampy Pit Level 1")]
    SwampyPitLevel1 = 86,
    #[strum(serialize = "Swampy Pit Level 2")]
    SwampyPitLevel2 = 87,
    #[strum(serialize = "Flayer Dungeon Level 1")]
    FlayerDungeonLevel1 = 88,
    #[strum(serialize = "Flayer Dungeon Level 2")]
    FlayerDungeonLevel2 = 89,
    #[strum(serialize = "Swampy Pit Level 3")]
    SwampyPitLevel3 = 90,
    #[strum(serialize = "Flayer Dungeon Level 3")]
    FlayerDungeonLevel3 = 91,
    #[strum(serialize = "Kurast Sewers Level 1")]
    SewersLevel1Act3 = 92,
    #[strum(serialize = "Kurast Sewers Level 2")]
    SewersLevel2Act3 = 93,
    #[strum(serialize = "Ruined Temple")]
    RuinedTemple = 94,
    #[strum(serialize = "Disused Fane")]
    DisusedFane = 95,
    #[strum(serialize = "Forgotten Reliquary")]
    ForgottenReliquary = 96,
    #[strum(serialize = "Forgotten Temple")]
    ForgottenTemple = 97,
    #[strum(serialize = "Ruined Fane")]
    RuinedFane = 98,
    #[strum(serialize = "Disused Reliquary")]
    DisusedReliquary = 99,
    #[strum(serialize = "Durance of Hate Level 1")]
    DuranceOfHateLevel1 = 100,
    #[strum(serialize = "Durance of Hate Level 2")]
    DuranceOfHateLevel2 = 101,
    #[strum(serialize = "Durance of Hate Level 3")]
    DuranceOfHateLevel3 = 102,
    // Act 4
    #[strum(serialize = "The Pandemonium Fortress")]
    ThePandemoniumFortress = 103,
    #[strum(serialize = "Outer Steppes")]
    OuterSteppes = 104,
    #[strum(serialize = "Plains of Despair")]
    PlainsOfDespair = 105,
    #[strum(serialize = "City of the Damned")]
    CityOfTheDamned = 106,
    #[strum(serialize = "River of Flame")]
    RiverOfFlame = 107,
    #[strum(serialize = "Chaos Sanctuary")]
    ChaosSanctuary = 108,
    // Act 5
    #[strum(serialize = "Harrogath")]
    Harrogath = 109,
    #[strum(serialize = "Bloody Foothills")]
    BloodyFoothills = 110,
    #[strum(serialize = "Frigid Highlands")]
    FrigidHighlands = 111,
    #[strum(serialize = "Arreat Plateau")]
    ArreatPlateau = 112,
    #[strum(serialize = "Crystalline Passage")]
    CrystallinePassage = 113,
    #[strum(serialize = "Frozen River")]
    FrozenRiver = 114,
    #[strum(serialize = "Glacial Trail")]
    GlacialTrail = 115,
    #[strum(serialize = "Drifter Cavern")]
    DrifterCavern = 116,
    #[strum(serialize = "Frozen Tundra")]
    FrozenTundra = 117,
    #[strum(serialize = "The Ancients' Way")]
    TheAncientsWay = 118,
    #[strum(serialize = "Icy Cellar")]
    IcyCellar = 119,
    #[strum(serialize = "Arreat Summit")]
    ArreatSummit = 120,
    #[strum(serialize = "Nihlathak's Temple")]
    NihlathaksTemple = 121,
    #[strum(serialize = "Halls of Anguish")]
    HallsOfAnguish = 122,
    #[strum(serialize = "Halls of Pain")]
    HallsOfPain = 123,
    #[strum(serialize = "Halls of Vaught")]
    HallsOfVaught = 124,
    #[strum(serialize = "Abaddon")]
    Abaddon = 125,
    #[strum(serialize = "Pit of Acheron")]
    PitOfAcheron = 126,
    #[strum(serialize = "Infernal Pit")]
    InfernalPit = 127,
    #[strum(serialize = "Worldstone Keep Level 1")]
    TheWorldStoneKeepLevel1 = 128,
    #[strum(serialize = "Worldstone Keep Level 2")]
    TheWorldStoneKeepLevel2 = 129,
    #[strum(serialize = "Worldstone Keep Level 3")]
    TheWorldStoneKeepLevel3 = 130,
    #[strum(serialize = "Throne of Destruction")]
    ThroneOfDestruction = 131,
    #[strum(serialize = "The Worldstone Chamber")]
    TheWorldstoneChamber = 132,
    // Pandemonium event
    #[strum(serialize = "Matron's Den")]
    MatronsDen = 133,
    #[strum(serialize = "Forgotten Sands")]
    ForgottenSands = 134,
    #[strum(serialize = "Furnace of Pain")]
    FurnaceOfPain = 135,
    #[strum(serialize = "Uber Tristram")]
    UberTristram = 136,
}

impl Area {
    pub fn from_id(id: u32) -> Option<Self> {
        Self::from_repr(id)
    }

    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// Towns of each act
    pub fn is_town(&self) -> bool {
        matches!(
            self,
            Self::RogueEncampment
                | Self::LutGholein
                | Self::KurastDocks
                | Self::ThePandemoniumFortress
                | Self::Harrogath
        )
    }

    /// Act number (1-5); 0 for `None`
    pub fn act(&self) -> u8 {
        match self.id() {
            0 => 0,
            1..=39 => 1,
            40..=74 => 2,
            75..=102 => 3,
            103..=108 => 4,
            _ => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}
