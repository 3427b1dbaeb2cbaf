/// Vertical refresh in Hz for a raw mode timing.
///
/// Doublescan repeats every line, so the effective vertical total doubles.
/// Interlaced modes report the field rate, so the total is halved afterwards.
/// Returns `0.0` when either total is zero.
pub fn refresh_hz(
    pixel_clock_hz: u32,
    h_total: u16,
    v_total: u16,
    doublescan: bool,
    interlace: bool,
) -> f64 {
    let mut v_total = f64::from(v_total);

    if doublescan {
        v_total *= 2.0;
    }

    if interlace {
        v_total /= 2.0;
    }

    if h_total == 0 || v_total == 0.0 {
        return 0.0;
    }

    f64::from(pixel_clock_hz) / (f64::from(h_total) * v_total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progressive_mode_is_clock_over_totals() {
        // 1920x1080@60 CEA timing
        let rate = refresh_hz(148_500_000, 2200, 1125, false, false);
        assert_eq!(rate, 148_500_000.0 / (2200.0 * 1125.0));
        assert!((rate - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_progressive_exact_for_odd_totals() {
        for &(clock, h, v) in &[(25_175_000u32, 800u16, 525u16), (1, 1, 1), (u32::MAX, 7, 13)] {
            let expected = f64::from(clock) / (f64::from(h) * f64::from(v));
            assert_eq!(refresh_hz(clock, h, v, false, false), expected);
        }
    }

    #[test]
    fn test_doublescan_halves_rate() {
        let base = refresh_hz(25_175_000, 800, 525, false, false);
        let doubled = refresh_hz(25_175_000, 800, 525, true, false);
        assert_eq!(doubled, base / 2.0);
    }

    #[test]
    fn test_interlace_doubles_rate() {
        let base = refresh_hz(74_250_000, 2200, 1125, false, false);
        let interlaced = refresh_hz(74_250_000, 2200, 1125, false, true);
        assert_eq!(interlaced, base * 2.0);
    }

    #[test]
    fn test_doublescan_and_interlace_cancel() {
        let base = refresh_hz(74_250_000, 2200, 1125, false, false);
        assert_eq!(refresh_hz(74_250_000, 2200, 1125, true, true), base);
    }

    #[test]
    fn test_zero_totals_are_undefined() {
        assert_eq!(refresh_hz(148_500_000, 0, 1125, false, false), 0.0);
        assert_eq!(refresh_hz(148_500_000, 2200, 0, false, false), 0.0);
        assert_eq!(refresh_hz(148_500_000, 0, 0, true, true), 0.0);
        assert_eq!(refresh_hz(0, 2200, 1125, false, false), 0.0);
    }
}
