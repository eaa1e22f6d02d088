use crate::foundation::core::{PixelDims, Vec2, Viewport};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
/// Named rule mapping content and viewport dimensions to an offset and scale.
pub enum FitPolicy {
    /// Center without scaling.
    Center,
    /// Uniformly cover the whole viewport; content may overflow.
    CenterCrop,
    /// Center, shrinking only if the content exceeds the viewport.
    CenterInside,
    /// Uniformly fit inside the viewport, centered.
    #[default]
    FitCenter,
    /// Uniformly fit inside the viewport, aligned top/left.
    FitStart,
    /// Uniformly fit inside the viewport, aligned bottom/right.
    FitEnd,
    /// Stretch each axis independently to match the viewport exactly.
    FitXY,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Draw transform produced by [`place`].
///
/// The caller applies the density pre-scale to the content first, then
/// translates by `offset` (expressed in pre-canvas-scale units) and applies
/// `scale_x`/`scale_y` as an additional canvas-level scale.
pub struct Placement {
    /// Translation applied before the canvas scale.
    pub offset: Vec2,
    /// Canvas scale along the x axis.
    pub scale_x: f64,
    /// Canvas scale along the y axis.
    pub scale_y: f64,
}

impl Placement {
    /// No-op transform, returned for degenerate geometry.
    pub const IDENTITY: Self = Self {
        offset: Vec2::new(0.0, 0.0),
        scale_x: 1.0,
        scale_y: 1.0,
    };

    fn uniform(x: f64, y: f64, s: f64) -> Self {
        Self {
            offset: Vec2::new(x, y),
            scale_x: s,
            scale_y: s,
        }
    }
}

/// Compute placement of `content` inside `viewport` under `policy`.
///
/// `scale` is the density-derived uniform pre-scale already applied to the
/// content; `gw`/`gh` below are the content dimensions after it. The offset
/// formulas are kept exactly as the fit rules define them, including the
/// non-centered, un-halved FitEnd offsets.
///
/// Degenerate geometry (zero content width or height after pre-scaling, or an
/// empty viewport) yields [`Placement::IDENTITY`] rather than a NaN/Inf
/// transform.
pub fn place(content: PixelDims, viewport: Viewport, scale: f64, policy: FitPolicy) -> Placement {
    let gw = f64::from(content.width) * scale;
    let gh = f64::from(content.height) * scale;
    if gw <= 0.0 || gh <= 0.0 || viewport.is_empty() {
        return Placement::IDENTITY;
    }
    let vw = viewport.width;
    let vh = viewport.height;

    match policy {
        FitPolicy::Center => {
            Placement::uniform((vw - gw) / 2.0 / scale, (vh - gh) / 2.0 / scale, 1.0)
        }
        FitPolicy::CenterCrop => {
            // The smaller geometric dimension determines the cover scale.
            let s = if gw <= gh { vw / gw } else { vh / gh };
            Placement::uniform(
                (vw - gw * s) / 2.0 / (s * scale),
                (vh - gh * s) / 2.0 / (s * scale),
                s,
            )
        }
        FitPolicy::CenterInside => {
            // Scaling only applies if the content is larger than the viewport.
            let s = if gw > vw || gh > vh {
                if gw >= gh { vw / gw } else { vh / gh }
            } else {
                1.0
            };
            Placement::uniform(
                (vw - gw * s) / 2.0 / (s * scale),
                (vh - gh * s) / 2.0 / (s * scale),
                s,
            )
        }
        FitPolicy::FitCenter => {
            let s = fit_scale(gw, gh, vw, vh);
            Placement::uniform(
                (vw - gw * s) / 2.0 / (s * scale),
                (vh - gh * s) / 2.0 / (s * scale),
                s,
            )
        }
        FitPolicy::FitStart => Placement::uniform(0.0, 0.0, fit_scale(gw, gh, vw, vh)),
        FitPolicy::FitEnd => {
            let s = fit_scale(gw, gh, vw, vh);
            Placement::uniform((vw - gw * s) / scale / s, (vh - gh * s) / scale / s, s)
        }
        FitPolicy::FitXY => Placement {
            offset: Vec2::new(0.0, 0.0),
            scale_x: vw / gw,
            scale_y: vh / gh,
        },
    }
}

/// Uniform scale that makes the larger content dimension exactly match its
/// viewport bound, shared by the FitCenter/FitStart/FitEnd policies.
fn fit_scale(gw: f64, gh: f64, vw: f64, vh: f64) -> f64 {
    if gw >= gh { vw / gw } else { vh / gh }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One axis of the host's measurement request.
pub enum Constraint {
    /// The axis must be exactly this size.
    Exact(f64),
    /// The axis may be at most this size.
    AtMost(f64),
    /// The host imposes no bound on this axis.
    Unspecified,
}

impl Constraint {
    fn is_bounded(self) -> bool {
        !matches!(self, Self::Unspecified)
    }

    fn size(self) -> f64 {
        match self {
            Self::Exact(size) | Self::AtMost(size) => size,
            Self::Unspecified => 0.0,
        }
    }
}

/// Measured size for `intrinsic` content under the host's constraints.
///
/// When the width is bounded it is scaled first: the height follows the
/// content aspect ratio, capped by a bounded height constraint with the width
/// recomputed from the cap. Otherwise the width is derived from the height.
/// Intrinsic dimensions are floored at one pixel.
pub fn measure(intrinsic: PixelDims, width: Constraint, height: Constraint) -> (f64, f64) {
    let iw = f64::from(intrinsic.width.max(1));
    let ih = f64::from(intrinsic.height.max(1));

    if width.is_bounded() {
        let mut w = width.size();
        let mut h = w * ih / iw;
        let max_h = height.size();
        if max_h > 0.0 && h > max_h {
            h = max_h;
            w = h * iw / ih;
        }
        (w, h)
    } else {
        let h = height.size();
        (h * iw / ih, h)
    }
}

#[cfg(test)]
#[path = "../tests/unit/viewport.rs"]
mod tests;
