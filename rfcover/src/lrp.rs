//! Propagation parameter (.lrp) files.
//!
//! One value per line, `;` starting a comment: dielectric constant,
//! conductivity, surface refractivity, frequency (MHz), radio climate,
//! polarization, confidence, reliability, and optionally ERP in watts
//! (or dBm when marked so).

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use propah::{Climate, Polarization, PropagationParameters};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};
use terrain::Site;

/// Parameter file read when a transmitter has none of its own.
pub const DEFAULT_LRP: &str = "splat.lrp";

/// Parses propagation parameters from `rdr`.
pub fn parse_lrp<R: BufRead>(rdr: R) -> Result<PropagationParameters> {
    let mut values = Vec::new();
    for line in rdr.lines() {
        let line = line?;
        let value = line.split(';').next().unwrap_or_default().trim();
        if !value.is_empty() {
            values.push(value.to_owned());
        }
    }
    let mut fields = values.iter().map(String::as_str);
    let mut next = |name: &str| fields.next().ok_or_else(|| anyhow!("missing {name}"));

    let mut params = PropagationParameters {
        dielectric: number(next("dielectric constant")?)?,
        conductivity: number(next("conductivity")?)?,
        refractivity: number(next("surface refractivity")?)?,
        frequency: number(next("frequency")?)?,
        climate: Climate::try_from(number::<i32>(next("radio climate")?)?)?,
        polarization: Polarization::try_from(number::<i32>(next("polarization")?)?)?,
        confidence: number(next("confidence")?)?,
        reliability: number(next("reliability")?)?,
        ..PropagationParameters::default()
    };
    if let Ok(erp) = next("erp") {
        let watts: f64 = number(erp)?;
        params.erp = if erp.contains("dBm") {
            10_f64.powf((watts - 32.14) / 10.0)
        } else {
            watts
        };
    }
    Ok(params)
}

/// Parses the leading number of `field`.
fn number<T>(field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    field
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .parse()
        .with_context(|| format!("invalid value {field:?}"))
}

pub fn load_lrp(path: &Path) -> Result<PropagationParameters> {
    let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
    parse_lrp(BufReader::new(file)).with_context(|| format!("reading {path:?}"))
}

/// Loads `explicit` if given, otherwise the parameter file named after
/// `tx`, then [DEFAULT_LRP] in the working directory, falling back to
/// defaults.
pub fn find_params(explicit: Option<&Path>, tx: &Site) -> Result<PropagationParameters> {
    if let Some(path) = explicit {
        return load_lrp(path);
    }
    let candidates = tx
        .filename
        .as_ref()
        .map(|qth| qth.with_extension("lrp"))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(DEFAULT_LRP)));
    for path in candidates {
        if path.exists() {
            info!("propagation parameters from {path:?}");
            return load_lrp(&path);
        }
    }
    warn!("no parameter file for {}, using defaults", tx.name);
    Ok(PropagationParameters::default())
}

#[cfg(test)]
mod tests {
    use super::{find_params, parse_lrp};
    use approx::assert_relative_eq;
    use propah::{Climate, Polarization};
    use terrain::Site;

    const LRP: &str = "\
15.000 ; Earth Dielectric Constant (Relative permittivity)
0.005 ; Earth Conductivity (Siemens per meter)
301.000 ; Atmospheric Bending Constant (N-units)
647.000 ; Frequency in MHz (20 MHz to 20 GHz)
5 ; Radio Climate
1 ; Polarization (0 = Horizontal, 1 = Vertical)
0.50 ; Fraction of situations
0.90 ; Fraction of time
";

    #[test]
    fn test_parse() {
        let params = parse_lrp(LRP.as_bytes()).unwrap();
        assert_relative_eq!(params.dielectric, 15.0);
        assert_relative_eq!(params.frequency, 647.0);
        assert_eq!(params.climate, Climate::ContinentalTemperate);
        assert_eq!(params.polarization, Polarization::Vertical);
        assert_relative_eq!(params.reliability, 0.9);
        assert_relative_eq!(params.erp, 0.0);
    }

    #[test]
    fn test_erp() {
        let watts = format!("{LRP}46000.0 ; ERP\n");
        assert_relative_eq!(parse_lrp(watts.as_bytes()).unwrap().erp, 46000.0);

        // 0 dBd is 32.14 dBm into a dipole.
        let dbm = format!("{LRP}62.14 dBm\n");
        assert_relative_eq!(parse_lrp(dbm.as_bytes()).unwrap().erp, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid() {
        assert!(parse_lrp("15.0\n0.005\n".as_bytes()).is_err());
        let bad_climate = LRP.replace("5 ; Radio", "9 ; Radio");
        assert!(parse_lrp(bad_climate.as_bytes()).is_err());
    }

    #[test]
    fn test_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let qth = dir.path().join("tower.qth");
        std::fs::write(dir.path().join("tower.lrp"), LRP).unwrap();
        let tx = Site::new(44.0, 71.0, 10.0).with_filename(qth);
        let params = find_params(None, &tx).unwrap();
        assert_relative_eq!(params.frequency, 647.0);
    }
}
