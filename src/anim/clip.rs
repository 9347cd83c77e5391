//! In-memory model of an animation clip's float curves.

/// Distance within which a keyframe time matches in
/// [`AnimationClip::remove_keyframe`].
pub const KEYFRAME_TIME_TOLERANCE: f32 = 0.001;

/// Tangent weight Unity writes for unweighted keyframes.
pub const DEFAULT_WEIGHT: f32 = 0.333_333_34;

/// One control point of a float curve.
///
/// Field names follow the serialized keyframe record. Slopes may be
/// `f32::INFINITY` or `f32::NEG_INFINITY` for stepped tangents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Time in seconds.
    pub time: f32,
    /// Value at `time`.
    pub value: f32,
    /// Incoming tangent.
    pub in_slope: f32,
    /// Outgoing tangent.
    pub out_slope: f32,
    /// Tangent mode bits as stored by Unity.
    pub tangent_mode: i32,
    /// Which tangents are weighted.
    pub weighted_mode: i32,
    /// Incoming tangent weight.
    pub in_weight: f32,
    /// Outgoing tangent weight.
    pub out_weight: f32,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            time: 0.0,
            value: 0.0,
            in_slope: 0.0,
            out_slope: 0.0,
            tangent_mode: 0,
            weighted_mode: 0,
            in_weight: DEFAULT_WEIGHT,
            out_weight: DEFAULT_WEIGHT,
        }
    }
}

impl Keyframe {
    /// Creates a keyframe with flat tangents and default weights.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            ..Self::default()
        }
    }

    /// Sets both slopes.
    pub fn slopes(mut self, in_slope: f32, out_slope: f32) -> Self {
        self.in_slope = in_slope;
        self.out_slope = out_slope;
        self
    }

    /// Sets the tangent mode bits.
    pub fn tangent_mode(mut self, mode: i32) -> Self {
        self.tangent_mode = mode;
        self
    }

    /// Sets the weighted mode and both weights.
    pub fn weights(mut self, weighted_mode: i32, in_weight: f32, out_weight: f32) -> Self {
        self.weighted_mode = weighted_mode;
        self.in_weight = in_weight;
        self.out_weight = out_weight;
        self
    }

    /// Returns `true` if either slope is infinite.
    pub fn is_stepped(&self) -> bool {
        self.in_slope.is_infinite() || self.out_slope.is_infinite()
    }
}

/// A float curve: one animated attribute on one object path.
///
/// Curves are identified by `(attribute, path)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatCurve {
    /// Animated property, e.g. `m_LocalPosition.x`.
    pub attribute: String,
    /// Transform path of the animated object, relative to the clip root.
    pub path: String,
    /// Keyframes in ascending time order.
    pub keyframes: Vec<Keyframe>,
}

impl FloatCurve {
    /// Creates a curve without keyframes.
    pub fn new(attribute: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            path: path.into(),
            keyframes: Vec::new(),
        }
    }

    /// Sets the keyframes, in the given order.
    pub fn with_keyframes(mut self, keyframes: impl IntoIterator<Item = Keyframe>) -> Self {
        self.keyframes = keyframes.into_iter().collect();
        self
    }

    /// Returns `true` if this curve has the given identity.
    pub fn is(&self, attribute: &str, path: &str) -> bool {
        self.attribute == attribute && self.path == path
    }

    /// Returns the time of the last keyframe, or 0 for an empty curve.
    pub fn duration(&self) -> f32 {
        self.keyframes.iter().map(|k| k.time).fold(0.0, f32::max)
    }
}

/// Name and float curves of an `AnimationClip` record.
///
/// Curves keep their load order; new curves are appended. The curve list can
/// only be changed through the methods below, so callers cannot break the
/// one-curve-per-identity rule the edit operations rely on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClip {
    name: String,
    curves: Vec<FloatCurve>,
}

impl AnimationClip {
    /// Creates a clip with the given name and curves.
    pub fn new(name: impl Into<String>, curves: Vec<FloatCurve>) -> Self {
        Self {
            name: name.into(),
            curves,
        }
    }

    /// Returns the clip name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the clip name. Any string is accepted, including an empty one.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the curves in order.
    pub fn curves(&self) -> &[FloatCurve] {
        &self.curves
    }

    /// Returns the first curve with the given identity.
    pub fn curve(&self, attribute: &str, path: &str) -> Option<&FloatCurve> {
        self.curves.iter().find(|c| c.is(attribute, path))
    }

    fn curve_mut(&mut self, attribute: &str, path: &str) -> Option<&mut FloatCurve> {
        self.curves.iter_mut().find(|c| c.is(attribute, path))
    }

    /// Adds a curve, or replaces the keyframes of the curve with the same
    /// identity in place.
    pub fn add_curve(&mut self, curve: FloatCurve) {
        match self.curve_mut(&curve.attribute, &curve.path) {
            Some(existing) => existing.keyframes = curve.keyframes,
            None => self.curves.push(curve),
        }
    }

    /// Removes the curve with the given identity. Returns `false` if there
    /// was none.
    pub fn remove_curve(&mut self, attribute: &str, path: &str) -> bool {
        let before = self.curves.len();
        self.curves.retain(|c| !c.is(attribute, path));
        self.curves.len() != before
    }

    /// Inserts a keyframe into a curve, keeping keyframes sorted by time.
    ///
    /// Keyframes with equal times keep their relative order, the new one
    /// last. Returns `false` and does nothing if no curve matches.
    pub fn add_keyframe(&mut self, attribute: &str, path: &str, keyframe: Keyframe) -> bool {
        let Some(curve) = self.curve_mut(attribute, path) else {
            return false;
        };
        curve.keyframes.push(keyframe);
        curve.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        true
    }

    /// Removes every keyframe of a curve whose time is within
    /// [`KEYFRAME_TIME_TOLERANCE`] of `time`.
    ///
    /// Returns the number of removed keyframes; 0 if no curve matches.
    pub fn remove_keyframe(&mut self, attribute: &str, path: &str, time: f32) -> usize {
        let Some(curve) = self.curve_mut(attribute, path) else {
            return 0;
        };
        let before = curve.keyframes.len();
        curve.keyframes.retain(|k| !same_time(k.time, time));
        before - curve.keyframes.len()
    }
}

/// Tolerance check, widened by one `f32` rounding step at the larger
/// magnitude so that `t` and `t + 0.001` always match.
fn same_time(a: f32, b: f32) -> bool {
    (a - b).abs() <= KEYFRAME_TIME_TOLERANCE + f32::EPSILON * a.abs().max(b.abs())
}
