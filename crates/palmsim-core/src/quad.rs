//! N-point Gauss-Legendre quadrature, reused by photosynthesis and energy
//! balance to integrate functions of solar hour or canopy depth.

use crate::Error;

/// Abscissas/weights on `[-1, 1]` for n-point Gauss-Legendre quadrature, n in [1, 9].
fn nodes(n: usize) -> Result<(&'static [f64], &'static [f64]), Error> {
    // Standard tabulated Gauss-Legendre nodes/weights (Abramowitz & Stegun Table 25.4).
    const N1_X: [f64; 1] = [0.0];
    const N1_W: [f64; 1] = [2.0];

    const N2_X: [f64; 2] = [-0.5773502691896257, 0.5773502691896257];
    const N2_W: [f64; 2] = [1.0, 1.0];

    const N3_X: [f64; 3] = [-0.7745966692414834, 0.0, 0.7745966692414834];
    const N3_W: [f64; 3] = [0.5555555555555556, 0.8888888888888888, 0.5555555555555556];

    const N4_X: [f64; 4] = [
        -0.8611363115940526,
        -0.3399810435848563,
        0.3399810435848563,
        0.8611363115940526,
    ];
    const N4_W: [f64; 4] = [
        0.3478548451374538,
        0.6521451548625461,
        0.6521451548625461,
        0.3478548451374538,
    ];

    const N5_X: [f64; 5] = [
        -0.9061798459386640,
        -0.5384693101056831,
        0.0,
        0.5384693101056831,
        0.9061798459386640,
    ];
    const N5_W: [f64; 5] = [
        0.2369268850561891,
        0.4786286704993665,
        0.5688888888888889,
        0.4786286704993665,
        0.2369268850561891,
    ];

    const N6_X: [f64; 6] = [
        -0.9324695142031521,
        -0.6612093864662645,
        -0.2386191860831969,
        0.2386191860831969,
        0.6612093864662645,
        0.9324695142031521,
    ];
    const N6_W: [f64; 6] = [
        0.1713244923791704,
        0.3607615730481386,
        0.4679139345726910,
        0.4679139345726910,
        0.3607615730481386,
        0.1713244923791704,
    ];

    const N7_X: [f64; 7] = [
        -0.9491079123427585,
        -0.7415311855993945,
        -0.4058451513773972,
        0.0,
        0.4058451513773972,
        0.7415311855993945,
        0.9491079123427585,
    ];
    const N7_W: [f64; 7] = [
        0.1294849661688697,
        0.2797053914892766,
        0.3818300505051189,
        0.4179591836734694,
        0.3818300505051189,
        0.2797053914892766,
        0.1294849661688697,
    ];

    const N8_X: [f64; 8] = [
        -0.9602898564975363,
        -0.7966664774136267,
        -0.5255324099163290,
        -0.1834346424956498,
        0.1834346424956498,
        0.5255324099163290,
        0.7966664774136267,
        0.9602898564975363,
    ];
    const N8_W: [f64; 8] = [
        0.1012285362903763,
        0.2223810344533745,
        0.3137066458778873,
        0.3626837833783620,
        0.3626837833783620,
        0.3137066458778873,
        0.2223810344533745,
        0.1012285362903763,
    ];

    const N9_X: [f64; 9] = [
        -0.9681602395076261,
        -0.8360311073266358,
        -0.6133714327005904,
        -0.3242534234038089,
        0.0,
        0.3242534234038089,
        0.6133714327005904,
        0.8360311073266358,
        0.9681602395076261,
    ];
    const N9_W: [f64; 9] = [
        0.0812743883615744,
        0.1806481606948574,
        0.2606106964029354,
        0.3123470770400029,
        0.3302393550012598,
        0.3123470770400029,
        0.2606106964029354,
        0.1806481606948574,
        0.0812743883615744,
    ];

    Ok(match n {
        1 => (&N1_X, &N1_W),
        2 => (&N2_X, &N2_W),
        3 => (&N3_X, &N3_W),
        4 => (&N4_X, &N4_W),
        5 => (&N5_X, &N5_W),
        6 => (&N6_X, &N6_W),
        7 => (&N7_X, &N7_W),
        8 => (&N8_X, &N8_W),
        9 => (&N9_X, &N9_W),
        _ => {
            return Err(Error::Quadrature(format!(
                "Gaussian quadrature order {n} outside [1, 9]"
            )))
        }
    })
}

/// Integrate `f` over `[a, b]` using n-point Gauss-Legendre quadrature, n in [1, 9].
pub fn gauss_legendre(n: usize, a: f64, b: f64, mut f: impl FnMut(f64) -> f64) -> Result<f64, Error> {
    let (xs, ws) = nodes(n)?;
    let half_width = (b - a) / 2.0;
    let mid = (b + a) / 2.0;
    let mut sum = 0.0;
    for (&x, &w) in xs.iter().zip(ws.iter()) {
        sum += w * f(mid + half_width * x);
    }
    Ok(sum * half_width)
}
