use time::Time;

/// Supplier-owned pricing profile. Read-only from the analytics side.
///
/// `peak_rate` and the peak window are independent optionals: a configured
/// peak rate of 0 is valid and distinct from "no peak rate". `current_flag`
/// is carried as the raw column value; [`TariffFlag::parse`] resolves it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TariffProfile {
    pub id: String,
    pub supplier_id: String,
    pub base_rate: f64,
    pub peak_rate: Option<f64>,
    pub peak_start: Option<Time>,
    pub peak_end: Option<Time>,
    pub green_flag_value: f64,
    pub yellow_flag_value: f64,
    pub red1_flag_value: f64,
    pub red2_flag_value: f64,
    pub current_flag: String,
}

impl TariffProfile {
    /// Surcharge value selected by the currently active flag.
    pub fn active_flag_value(&self) -> f64 {
        self.flag_value(TariffFlag::parse(&self.current_flag))
    }

    pub fn flag_value(&self, flag: TariffFlag) -> f64 {
        match flag {
            TariffFlag::Green => self.green_flag_value,
            TariffFlag::Yellow => self.yellow_flag_value,
            TariffFlag::Red1 => self.red1_flag_value,
            TariffFlag::Red2 => self.red2_flag_value,
        }
    }
}

/// Color-coded surcharge tier applied per kWh on top of base/peak rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TariffFlag {
    Green,
    Yellow,
    Red1,
    Red2,
}

impl TariffFlag {
    /// Resolve a stored flag label. Any unrecognized label falls back to
    /// `Green`; a stale or misspelled flag must never fail a cost
    /// computation, it prices at the lowest band instead.
    pub fn parse(s: &str) -> Self {
        match s {
            "yellow" => Self::Yellow,
            "red1" => Self::Red1,
            "red2" => Self::Red2,
            _ => Self::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red1 => "red1",
            Self::Red2 => "red2",
        }
    }
}
