//! The `convert` command: SRTM (.hgt) to SDF.

use crate::{options::Convert, progress};
use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use terrain::sdf::{read_hgt, write_sdf};

impl Convert {
    pub fn run(&self) -> Result<()> {
        let pb = progress::bar("Convert to SDF".to_owned(), self.input.len() as u64)?;
        self.input.par_iter().try_for_each(|hgt_path| {
            let converted = self.convert(hgt_path);
            pb.inc(1);
            converted.map(|_| ())
        })?;
        pb.finish_and_clear();
        Ok(())
    }

    /// Converts one file, returning the SDF path written, or `None`
    /// if it already existed.
    fn convert(&self, hgt_path: &Path) -> Result<Option<PathBuf>> {
        let tile = read_hgt(hgt_path).with_context(|| format!("reading {hgt_path:?}"))?;
        let stem = tile.key().file_stem(tile.resolution());
        let out_path = self.out_dir.join(format!("{stem}.sdf"));
        if out_path.exists() && !self.overwrite {
            info!("{out_path:?} exists, skipping");
            return Ok(None);
        }

        let tmp_path = out_path.with_extension("tmp");
        let mut wtr = BufWriter::new(File::create(&tmp_path)?);
        write_sdf(&tile, &mut wtr).with_context(|| format!("writing {tmp_path:?}"))?;
        wtr.flush()?;
        fs::rename(&tmp_path, &out_path)?;
        info!("{hgt_path:?} -> {out_path:?}");
        Ok(Some(out_path))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::Convert;
    use byteorder::{BigEndian as BE, WriteBytesExt};
    use std::{
        fs::File,
        io::{BufReader, BufWriter},
    };
    use terrain::sdf::{read_sdf, Resolution};

    #[test]
    fn test_convert() {
        let dir = tempfile::tempdir().unwrap();
        let hgt_path = dir.path().join("N44W072.hgt");
        {
            let mut wtr = BufWriter::new(File::create(&hgt_path).unwrap());
            for _ in 0..1201 * 1201 {
                wtr.write_i16::<BE>(100).unwrap();
            }
        }
        let cmd = Convert {
            overwrite: false,
            out_dir: dir.path().to_path_buf(),
            input: vec![hgt_path.clone()],
        };
        let out = cmd.convert(&hgt_path).unwrap().unwrap();
        assert_eq!(out, dir.path().join("44:45:71:72.sdf"));

        let rdr = BufReader::new(File::open(&out).unwrap());
        let tile = read_sdf(rdr, Resolution::Standard).unwrap();
        assert_eq!(tile.max_elevation(), 100);

        // Existing output is left alone.
        assert!(cmd.convert(&hgt_path).unwrap().is_none());
    }
}
