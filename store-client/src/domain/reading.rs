use time::OffsetDateTime;

/// A single metered consumption fact. `kwh` and `ts` are fixed at creation;
/// only the auxiliary electrical metrics and `notes` may be amended later.
#[derive(Debug, Clone, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConsumptionReading {
    pub ts: OffsetDateTime,
    pub device_id: String,
    pub area_id: Option<String>,
    pub plant_id: Option<String>,
    pub kwh: f64,
    /// manual, modbus, opc_ua, mqtt or bacnet.
    pub source: Option<String>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub power_factor: Option<f64>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvalidReading {
    #[error("kwh must be non-negative")]
    NegativeKwh,
    #[error("timestamp must not be later than now")]
    FutureTimestamp,
    #[error("power factor must be within [0, 1]")]
    PowerFactorOutOfRange,
}

impl ConsumptionReading {
    /// Creation-time rules.
    ///
    /// Rules:
    /// - kWh must be non-negative.
    /// - ts must not be later than `now`; back-dated readings are fine.
    /// - power factor, when present, must lie in [0, 1].
    pub fn validate(&self, now: OffsetDateTime) -> Result<(), InvalidReading> {
        if self.kwh < 0.0 {
            return Err(InvalidReading::NegativeKwh);
        }
        if self.ts > now {
            return Err(InvalidReading::FutureTimestamp);
        }
        if let Some(pf) = self.power_factor {
            if !(0.0..=1.0).contains(&pf) {
                return Err(InvalidReading::PowerFactorOutOfRange);
            }
        }
        Ok(())
    }
}
