//! Aggregate statistics over a set of readings.
//!
//! Two independent computations: overall pollutant averages and the
//! dominant pollutant for each hour of the day. Both are pure functions of
//! the input slice.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::reading::{Pollutant, Reading};

pub const HOURS: usize = 24;

/// Mean value per pollutant across every reading.
///
/// Empty when built from no readings, never zero- or NaN-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GlobalAverages(BTreeMap<Pollutant, f64>);

impl GlobalAverages {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.0.get(&pollutant).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in [`Pollutant::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }
}

/// Computes the mean of pm25 and co2 over all readings.
///
/// `no2` and `ozone` do not take part even when present.
pub fn global_averages(readings: &[Reading]) -> GlobalAverages {
    if readings.is_empty() {
        return GlobalAverages::default();
    }

    let n = readings.len() as f64;
    let averages = Pollutant::ALL
        .iter()
        .map(|&p| {
            let total: f64 = readings.iter().map(|r| p.value(r)).sum();
            (p, total / n)
        })
        .collect();

    GlobalAverages(averages)
}

/// Running sum and count per pollutant for one hour of the day.
#[derive(Debug, Clone, Copy, Default)]
struct HourBucket {
    sums: [f64; 2],
    counts: [usize; 2],
}

impl HourBucket {
    fn add(&mut self, reading: &Reading) {
        for p in Pollutant::ALL {
            self.sums[p.index()] += p.value(reading);
            self.counts[p.index()] += 1;
        }
    }

    fn average(&self, pollutant: Pollutant) -> Option<f64> {
        let count = self.counts[pollutant.index()];
        if count == 0 {
            None
        } else {
            Some(self.sums[pollutant.index()] / count as f64)
        }
    }

    /// Highest average strictly above 0.0, earliest pollutant on ties.
    fn dominant(&self) -> Option<Pollutant> {
        let mut max_avg = 0.0;
        let mut winner = None;

        for p in Pollutant::ALL {
            if let Some(avg) = self.average(p) {
                if avg > max_avg {
                    max_avg = avg;
                    winner = Some(p);
                }
            }
        }

        winner
    }
}

/// Dominant pollutant for each hour 0..=23.
///
/// `None` means no pollutant average rose above zero in that hour, which
/// covers both "no readings" and "only zero readings".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyDominant([Option<Pollutant>; HOURS]);

impl HourlyDominant {
    pub fn get(&self, hour: usize) -> Option<Pollutant> {
        self.0.get(hour).copied().flatten()
    }

    /// Pollutant name for `hour`, or `""` when there is none.
    pub fn name(&self, hour: usize) -> &'static str {
        self.get(hour).map_or("", Pollutant::name)
    }

    /// True when no hour has a dominant pollutant.
    pub fn is_all_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<Pollutant>)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

impl Serialize for HourlyDominant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry {
            hour: usize,
            pollutant: &'static str,
        }

        let mut seq = serializer.serialize_seq(Some(HOURS))?;
        for hour in 0..HOURS {
            seq.serialize_element(&Entry {
                hour,
                pollutant: self.name(hour),
            })?;
        }
        seq.end()
    }
}

/// Classifies each hour of the day by its highest-average pollutant.
pub fn hourly_dominant(readings: &[Reading]) -> HourlyDominant {
    dominant_by_hour(&hour_buckets(readings))
}

fn hour_buckets(readings: &[Reading]) -> [HourBucket; HOURS] {
    let mut buckets = [HourBucket::default(); HOURS];
    for r in readings {
        buckets[r.hour()].add(r);
    }
    buckets
}

/// Per-hour pollutant averages, `None` where the hour saw no readings.
pub fn hourly_averages(readings: &[Reading]) -> [[Option<f64>; 2]; HOURS] {
    averages_by_hour(&hour_buckets(readings))
}

fn dominant_by_hour(buckets: &[HourBucket; HOURS]) -> HourlyDominant {
    HourlyDominant(buckets.map(|b| b.dominant()))
}

fn averages_by_hour(buckets: &[HourBucket; HOURS]) -> [[Option<f64>; 2]; HOURS] {
    buckets.map(|b| Pollutant::ALL.map(|p| b.average(p)))
}

/// Everything the reporter prints for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub reading_count: usize,
    pub global_averages: GlobalAverages,
    pub hourly_dominant: HourlyDominant,
    #[serde(skip)]
    pub hourly_averages: [[Option<f64>; 2]; HOURS],
}

impl Summary {
    pub fn from_readings(readings: &[Reading]) -> Self {
        let buckets = hour_buckets(readings);

        Summary {
            reading_count: readings.len(),
            global_averages: global_averages(readings),
            hourly_dominant: dominant_by_hour(&buckets),
            hourly_averages: averages_by_hour(&buckets),
        }
    }
}
