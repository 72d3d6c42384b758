/// Pixel size of the hosting surface. Layout only runs when both sides are
/// positive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn has_area(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center_x(self) -> f32 {
        self.width * 0.5
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Distance of the root baseline from the bottom edge and of the highest
    /// tier from the top edge.
    pub margin: f32,
    /// Half-width of the horizontal start jitter for non-root nodes.
    pub jitter: f32,
    pub seed: u64,
    pub link_distance: f32,
    pub link_strength: f32,
    /// Negative values repel.
    pub charge_strength: f32,
    pub charge_theta: f32,
    pub charge_distance_min: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub collision_passes: usize,
    pub tier_strength: f32,
    pub center_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    /// Number of ticks a cold start takes to cool from 1 to `alpha_min`.
    pub cooling_ticks: u32,
    pub drag_alpha_target: f32,
    pub tick_hz: f32,
    pub settle_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            jitter: 150.0,
            seed: 42,
            link_distance: 120.0,
            link_strength: 0.4,
            charge_strength: -400.0,
            charge_theta: 0.9,
            charge_distance_min: 1.0,
            collision_padding: 15.0,
            collision_strength: 1.0,
            collision_passes: 2,
            tier_strength: 1.2,
            center_strength: 0.05,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            cooling_ticks: 300,
            drag_alpha_target: 0.3,
            tick_hz: 60.0,
            settle_passes: 96,
        }
    }
}

impl LayoutConfig {
    pub fn alpha_decay(&self) -> f32 {
        let ticks = self.cooling_ticks.max(1) as f32;
        1.0 - self.alpha_min.clamp(1.0e-6, 0.99).powf(1.0 / ticks)
    }

    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_hz.clamp(1.0, 480.0)
    }
}

/// Vertical targets for each tier: tier 0 on the baseline near the bottom,
/// `max_tier` at the top margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierBands {
    pub bottom: f32,
    pub top: f32,
    pub max_tier: u32,
}

impl TierBands {
    pub fn new(size: CanvasSize, margin: f32, max_tier: u32) -> Self {
        let margin = margin.clamp(0.0, size.height * 0.25);
        Self {
            bottom: size.height - margin,
            top: margin,
            max_tier: max_tier.max(1),
        }
    }

    pub fn y_for(&self, tier: u32) -> f32 {
        let ratio = tier as f32 / self.max_tier as f32;
        self.bottom - ratio * (self.bottom - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_sizes_have_no_area() {
        assert!(!CanvasSize::new(0.0, 400.0).has_area());
        assert!(!CanvasSize::new(400.0, 0.0).has_area());
        assert!(!CanvasSize::new(-1.0, 400.0).has_area());
        assert!(!CanvasSize::new(f32::NAN, 400.0).has_area());
        assert!(CanvasSize::new(1.0, 1.0).has_area());
    }

    #[test]
    fn bands_interpolate_from_baseline_to_top_margin() {
        let bands = TierBands::new(CanvasSize::new(800.0, 600.0), 100.0, 4);
        assert_eq!(bands.y_for(0), 500.0);
        assert_eq!(bands.y_for(2), 300.0);
        assert_eq!(bands.y_for(4), 100.0);
    }

    #[test]
    fn bands_floor_max_tier_and_shrink_margin_on_short_canvases() {
        let bands = TierBands::new(CanvasSize::new(300.0, 120.0), 100.0, 0);
        assert_eq!(bands.max_tier, 1);
        assert_eq!(bands.top, 30.0);
        assert_eq!(bands.bottom, 90.0);
        assert!(bands.y_for(1) < bands.y_for(0));
    }

    #[test]
    fn default_cooling_reaches_alpha_min_after_configured_ticks() {
        let config = LayoutConfig::default();
        let decay = config.alpha_decay();
        let mut alpha = 1.0_f32;
        let mut ticks = 0;
        while alpha >= config.alpha_min {
            alpha += (0.0 - alpha) * decay;
            ticks += 1;
        }
        assert!((295..=305).contains(&ticks), "{ticks}");
    }
}
