// Copyright 2025 Gibran Rodriguez <brangi000@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Human readable number formatting for comparison tables

/// Format a metric value: integral counts get thousands separators,
/// fractional values keep a few significant decimals.
pub fn human_readable(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return group_thousands(&format!("{:.0}", value));
    }
    if value.abs() >= 1000.0 {
        let rounded = format!("{:.2}", value);
        return match rounded.split_once('.') {
            Some((whole, "00")) => group_thousands(whole),
            Some((whole, decimals)) => format!("{}.{}", group_thousands(whole), decimals),
            None => group_thousands(&rounded),
        };
    }
    if value.abs() >= 1.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.6}", value)
    }
}

/// Insert separators into an optionally signed string of digits
fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", number),
    };
    let mut out = String::with_capacity(number.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_values() {
        assert_eq!(human_readable(0.0), "0");
        assert_eq!(human_readable(500.0), "500");
        assert_eq!(human_readable(1234567.0), "1,234,567");
        assert_eq!(human_readable(-1000.0), "-1,000");
    }

    #[test]
    fn test_fractional_values() {
        assert_eq!(human_readable(0.5), "0.500000");
        assert_eq!(human_readable(2.25), "2.250");
        assert_eq!(human_readable(1500.25), "1,500.25");
        assert_eq!(human_readable(1999.999), "2,000");
    }

    #[test]
    fn test_values_beyond_i64_range() {
        assert_eq!(human_readable(1e15), "1,000,000,000,000,000");
        assert_eq!(human_readable(2e15), "2,000,000,000,000,000");
        assert_eq!(human_readable(1e19), "10,000,000,000,000,000,000");
        assert_eq!(human_readable(-1e19), "-10,000,000,000,000,000,000");
    }
}
