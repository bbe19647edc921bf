//! Column-major datasets and an MNIST (IDX) loader that keeps two digit classes.
use crate::error::{NetError, NetResult};
use anyhow::{anyhow, bail, Context, Result};
use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use ndarray::{Array1, Array2, Axis};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

const LABEL_MAGIC: i32 = 2049;
const IMAGE_MAGIC: i32 = 2051;

/// Inputs `x` of shape `(features, m)` and binary labels `y` of shape `(1, m)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> NetResult<Self> {
        if y.shape() != [1, x.ncols()] {
            return Err(NetError::shape("dataset labels", &[1, x.ncols()], y.shape()));
        }
        if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(NetError::Configuration(format!(
                "labels must be 0 or 1, found {}",
                bad
            )));
        }
        Ok(Self { x, y })
    }

    /// Skips validation; callers guarantee `y` is a 0/1 row sized to `x`.
    pub(crate) fn from_parts(x: Array2<f64>, y: Array2<f64>) -> Self {
        debug_assert_eq!(y.shape(), &[1, x.ncols()]);
        Self { x, y }
    }

    /// Builds a dataset from one example per row plus a flat label vector.
    pub fn from_rows(rows: Array2<f64>, labels: Array1<f64>) -> NetResult<Self> {
        if rows.nrows() != labels.len() {
            return Err(NetError::shape("dataset rows", &[labels.len()], &[rows.nrows()]));
        }
        let x = rows.reversed_axes().as_standard_layout().into_owned();
        let y = labels.insert_axis(Axis(0));
        Dataset::new(x, y)
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    pub fn num_features(&self) -> usize {
        self.x.nrows()
    }

    pub fn num_examples(&self) -> usize {
        self.x.ncols()
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (self.x, self.y)
    }
}

/// Raw IDX contents: header dimensions and the payload bytes.
#[derive(Debug)]
struct IdxData {
    sizes: Vec<usize>,
    data: Vec<u8>,
}

impl IdxData {
    fn parse(contents: &[u8]) -> Result<Self> {
        let mut r = Cursor::new(contents);
        let magic = r.read_i32::<BigEndian>().context("reading magic number")?;
        let ndims = match magic {
            LABEL_MAGIC => 1,
            IMAGE_MAGIC => 3,
            _ => bail!("invalid magic: {}", magic),
        };
        let mut sizes = Vec::with_capacity(ndims);
        for _ in 0..ndims {
            let size = r.read_i32::<BigEndian>().context("reading dimension")?;
            if size < 0 {
                bail!("negative dimension {}", size);
            }
            sizes.push(size as usize);
        }
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;
        let Some(expected) = sizes.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d)) else {
            bail!("header dimensions overflow: {:?}", sizes);
        };
        if data.len() < expected {
            bail!("truncated payload: expected {} bytes, found {}", expected, data.len());
        }
        data.truncate(expected);
        Ok(Self { sizes, data })
    }

    /// Reads `<name>.gz` from `dir`, falling back to the uncompressed `<name>`.
    fn open(dir: &Path, name: &str) -> Result<Self> {
        let gz_path = dir.join(format!("{}.gz", name));
        let raw_path = dir.join(name);
        let mut contents = Vec::new();
        if gz_path.exists() {
            let file = File::open(&gz_path)
                .with_context(|| format!("failed to open {}", gz_path.display()))?;
            GzDecoder::new(file)
                .read_to_end(&mut contents)
                .with_context(|| format!("gzip read error in {}", gz_path.display()))?;
        } else {
            File::open(&raw_path)
                .with_context(|| format!("failed to open {}", raw_path.display()))?
                .read_to_end(&mut contents)?;
        }
        Self::parse(&contents).with_context(|| format!("parsing {}", name))
    }
}

/// Loads the MNIST train (`train == true`) or t10k split from `data_dir`, keeping
/// only digits `digits.0` and `digits.1`, relabelled to 0 and 1 respectively.
///
/// Pixels are scaled to `[0, 1]`; the result has one column per kept example.
pub fn load_mnist_pair<P: AsRef<Path>>(
    data_dir: P,
    digits: (u8, u8),
    train: bool,
) -> Result<Dataset> {
    let (first, second) = digits;
    if first == second {
        bail!("need two distinct digits, got {} twice", first);
    }
    let dir = data_dir.as_ref();
    let prefix = if train { "train" } else { "t10k" };
    let labels = IdxData::open(dir, &format!("{}-labels-idx1-ubyte", prefix))?;
    let images = IdxData::open(dir, &format!("{}-images-idx3-ubyte", prefix))?;
    if labels.sizes.len() != 1 || images.sizes.len() != 3 {
        bail!("label/image files swapped or malformed");
    }
    let num_images = images.sizes[0];
    if labels.sizes[0] != num_images {
        bail!("{} labels for {} images", labels.sizes[0], num_images);
    }
    let image_size = images.sizes[1]
        .checked_mul(images.sizes[2])
        .ok_or_else(|| anyhow!("image dimensions overflow"))?;

    let mut pixels = Vec::new();
    let mut targets = Vec::new();
    for (i, &label) in labels.data.iter().enumerate() {
        let target = if label == first {
            0.0
        } else if label == second {
            1.0
        } else {
            continue;
        };
        let start = i * image_size;
        let img_bytes = &images.data[start..start + image_size];
        pixels.extend(img_bytes.iter().map(|&b| b as f64 / 255.0));
        targets.push(target);
    }
    if targets.is_empty() {
        return Err(anyhow!(
            "no examples with digits {} or {} in {}",
            first,
            second,
            dir.display()
        ));
    }
    let rows = Array2::from_shape_vec((targets.len(), image_size), pixels)?;
    let dataset = Dataset::from_rows(rows, Array1::from(targets))?;
    tracing::info!(
        "loaded {} {} examples of digits {} vs {}",
        dataset.num_examples(),
        prefix,
        first,
        second
    );
    Ok(dataset)
}
