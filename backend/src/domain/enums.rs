//! Closed enumerations backing the sign-up form's choice fields.
//!
//! Each enumeration pairs a stable storage code with a Persian display
//! label. Validation is a membership check against the closed set; no
//! reflection or dynamic dispatch is involved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Parse error shared by all form enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value is not a member of the {set} enumeration: {input}")]
pub struct UnknownEnumCode {
    /// Name of the enumeration that rejected the value.
    pub set: &'static str,
    /// The rejected input value.
    pub input: String,
}

impl UnknownEnumCode {
    fn new(set: &'static str, input: &str) -> Self {
        Self {
            set,
            input: input.to_owned(),
        }
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $set:literal, {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                #[doc = $label]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the enumeration, in form display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable code stored in the database and posted by the form.
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Persian display label shown on the form and in exports.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = UnknownEnumCode;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($code => Ok(Self::$variant),)+
                    other => Err(UnknownEnumCode::new($set, other)),
                }
            }
        }
    };
}

choice_enum! {
    /// City a prospective user signs up from.
    City, "city", {
        Tehran => ("TEHRAN", "تهران"),
        Mashhad => ("MASHHAD", "مشهد"),
        Isfahan => ("ISFAHAN", "اصفهان"),
        Shiraz => ("SHIRAZ", "شیراز"),
        Tabriz => ("TABRIZ", "تبریز"),
        Karaj => ("KARAJ", "کرج"),
        Ahvaz => ("AHVAZ", "اهواز"),
        Qom => ("QOM", "قم"),
        Kermanshah => ("KERMANSHAH", "کرمانشاه"),
        Urmia => ("URMIA", "ارومیه"),
        Rasht => ("RASHT", "رشت"),
        Zahedan => ("ZAHEDAN", "زاهدان"),
        Kerman => ("KERMAN", "کرمان"),
        Yazd => ("YAZD", "یزد"),
        Arak => ("ARAK", "اراک"),
        Ardabil => ("ARDABIL", "اردبیل"),
        BandarAbbas => ("BANDAR_ABBAS", "بندر عباس"),
        Eslamshahr => ("ESLAMSHAHR", "اسلامشهر"),
        Zanjan => ("ZANJAN", "زنجان"),
        Sanandaj => ("SANANDAJ", "سنندج"),
        Khorramabad => ("KHORRAMABAD", "خرم‌آباد"),
        Gorgan => ("GORGAN", "گرگان"),
        Sari => ("SARI", "ساری"),
        Dezful => ("DEZFUL", "دزفول"),
        Saveh => ("SAVEH", "ساوه"),
        Bojnurd => ("BOJNURD", "بجنورد"),
        Other => ("OTHER", "سایر شهرها"),
    }
}

choice_enum! {
    /// What the prospective user wants out of the application.
    FitnessGoal, "fitness goal", {
        WeightLoss => ("WEIGHT_LOSS", "کاهش وزن"),
        MuscleGain => ("MUSCLE_GAIN", "افزایش عضله"),
        GeneralFitness => ("GENERAL_FITNESS", "تناسب عمومی"),
        Endurance => ("ENDURANCE", "استقامت"),
        Flexibility => ("FLEXIBILITY", "انعطاف‌پذیری"),
    }
}

choice_enum! {
    /// How the prospective user intends to use the application.
    Role, "role", {
        User => ("USER", "کاربر (دانشجو)"),
        Coach => ("COACH", "مربی"),
        Dietitian => ("DIETITIAN", "متخصص تغذیه"),
        Gym => ("GYM", "باشگاه"),
    }
}
