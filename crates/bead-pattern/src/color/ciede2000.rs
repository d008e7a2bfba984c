//! CIEDE2000 color difference (ΔE00)
//!
//! Implementation of Sharma, Wu & Dalal, "The CIEDE2000 Color-Difference
//! Formula: Implementation Notes, Supplementary Test Data, and Mathematical
//! Observations" (2005), with parametric weights kL = kC = kH = 1.

use std::f64::consts::PI;

use super::lab::Lab;

const TWO_PI: f64 = 2.0 * PI;
const POW25_7: f64 = 6_103_515_625.0; // 25^7

#[inline]
fn deg(d: f64) -> f64 {
    d.to_radians()
}

/// Hue angle in radians, 0..2π; zero for achromatic colors.
#[inline]
fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a);
    if h < 0.0 {
        h + TWO_PI
    } else {
        h
    }
}

/// CIEDE2000 distance between two L*a*b* colors.
///
/// Symmetric, non-negative and exactly `0.0` for identical inputs.
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    let c1_star = lab1.a.hypot(lab1.b);
    let c2_star = lab2.a.hypot(lab2.b);
    let c_bar = (c1_star + c2_star) / 2.0;

    let c_bar_7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar_7 / (c_bar_7 + POW25_7)).sqrt());

    let a1_prime = lab1.a * (1.0 + g);
    let a2_prime = lab2.a * (1.0 + g);

    let c1_prime = a1_prime.hypot(lab1.b);
    let c2_prime = a2_prime.hypot(lab2.b);

    let h1_prime = hue_angle(a1_prime, lab1.b);
    let h2_prime = hue_angle(a2_prime, lab2.b);

    let dl_prime = lab2.l - lab1.l;
    let dc_prime = c2_prime - c1_prime;

    let chroma_product = c1_prime * c2_prime;
    let dh_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2_prime - h1_prime;
        if diff.abs() <= PI {
            diff
        } else if diff > PI {
            diff - TWO_PI
        } else {
            diff + TWO_PI
        }
    };
    let dh_prime_big = 2.0 * chroma_product.sqrt() * (dh_prime / 2.0).sin();

    let l_bar_prime = (lab1.l + lab2.l) / 2.0;
    let c_bar_prime = (c1_prime + c2_prime) / 2.0;

    let h_bar_prime = if chroma_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= PI {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < TWO_PI {
        (h1_prime + h2_prime + TWO_PI) / 2.0
    } else {
        (h1_prime + h2_prime - TWO_PI) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_prime - deg(30.0)).cos()
        + 0.24 * (2.0 * h_bar_prime).cos()
        + 0.32 * (3.0 * h_bar_prime + deg(6.0)).cos()
        - 0.20 * (4.0 * h_bar_prime - deg(63.0)).cos();

    let l_mid_sq = (l_bar_prime - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_mid_sq) / (20.0 + l_mid_sq).sqrt();
    let sc = 1.0 + 0.045 * c_bar_prime;
    let sh = 1.0 + 0.015 * c_bar_prime * t;

    let delta_theta = deg(30.0) * (-((h_bar_prime - deg(275.0)) / deg(25.0)).powi(2)).exp();
    let c_bar_prime_7 = c_bar_prime.powi(7);
    let rc = 2.0 * (c_bar_prime_7 / (c_bar_prime_7 + POW25_7)).sqrt();
    let rt = -rc * (2.0 * delta_theta).sin();

    let dl_term = dl_prime / sl;
    let dc_term = dc_prime / sc;
    let dh_term = dh_prime_big / sh;

    (dl_term * dl_term + dc_term * dc_term + dh_term * dh_term + rt * dc_term * dh_term)
        .max(0.0)
        .sqrt()
}
