//! Clock digits - the six labels fed to the generator

use std::fmt;

/// Number of digit images shown by the clock (hh:mm:ss)
pub const DIGIT_COUNT: usize = 6;

/// Six decimal digits derived from a wall-clock reading
///
/// Layout: `[hour tens, hour ones, minute tens, minute ones, second tens, second ones]`.
/// Hours are on a 12-hour cycle where the top of the cycle reads as `00`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeDigits([u8; DIGIT_COUNT]);

impl TimeDigits {
    /// Build digits from a 24-hour reading
    ///
    /// Minutes and seconds are taken modulo 60, hours modulo 12. Noon and
    /// midnight both produce `00` for the hour pair.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        let hour12 = hour % 12;
        let minute = minute % 60;
        let second = second % 60;

        TimeDigits([
            (hour12 / 10) as u8,
            (hour12 % 10) as u8,
            (minute / 10) as u8,
            (minute % 10) as u8,
            (second / 10) as u8,
            (second % 10) as u8,
        ])
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        DIGIT_COUNT
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Hour on the 12-hour cycle (0..=11)
    pub fn hour12(&self) -> u32 {
        self.pair(0)
    }

    pub fn minute(&self) -> u32 {
        self.pair(1)
    }

    pub fn second(&self) -> u32 {
        self.pair(2)
    }

    fn pair(&self, index: usize) -> u32 {
        let tens = self.0[index * 2] as u32;
        let ones = self.0[index * 2 + 1] as u32;
        tens * 10 + ones
    }
}

impl From<TimeDigits> for [u8; DIGIT_COUNT] {
    fn from(digits: TimeDigits) -> Self {
        digits.0
    }
}

impl fmt::Debug for TimeDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeDigits({})", self)
    }
}

impl fmt::Display for TimeDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        write!(f, "{}{}:{}{}:{}{}", d[0], d[1], d[2], d[3], d[4], d[5])
    }
}
