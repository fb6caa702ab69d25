use crate::error::ModelLoadError;
use crate::index::{Vocabulary, VocabularyModel, WeightMatrix};
use crate::vector::SparseVector;
use anyhow::Result;
use bincode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
    pub smoothed_idf: bool,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn vocabulary(&self) -> PathBuf { self.root.join("vocabulary.bin") }
    fn matrix(&self) -> PathBuf { self.root.join("matrix.bin") }
    fn titles(&self) -> PathBuf { self.root.join("titles.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>, ModelLoadError> {
    let io_err = |source: std::io::Error| match source.kind() {
        ErrorKind::NotFound => ModelLoadError::Missing(path.to_path_buf()),
        _ => ModelLoadError::Io { path: path.to_path_buf(), source },
    };
    let mut f = File::open(path).map_err(io_err)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(io_err)?;
    Ok(buf)
}

fn decode<T: DeserializeOwned>(path: &Path) -> Result<T, ModelLoadError> {
    let buf = read_file(path)?;
    bincode::deserialize(&buf).map_err(|source| ModelLoadError::Decode { path: path.to_path_buf(), source })
}

pub fn save_vocabulary(paths: &IndexPaths, vocabulary: &Vocabulary) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_file(&paths.vocabulary(), &bincode::serialize(vocabulary)?)
}

pub fn load_vocabulary(paths: &IndexPaths) -> Result<Vocabulary, ModelLoadError> {
    decode(&paths.vocabulary())
}

pub fn save_matrix(paths: &IndexPaths, matrix: &WeightMatrix) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_file(&paths.matrix(), &bincode::serialize(matrix.rows())?)
}

pub fn load_matrix(paths: &IndexPaths) -> Result<WeightMatrix, ModelLoadError> {
    let rows: Vec<SparseVector> = decode(&paths.matrix())?;
    Ok(WeightMatrix::new(rows))
}

pub fn save_titles(paths: &IndexPaths, titles: &[String]) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_file(&paths.titles(), &bincode::serialize(titles)?)
}

pub fn load_titles(paths: &IndexPaths) -> Result<Vec<String>, ModelLoadError> {
    decode(&paths.titles())
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(meta)?;
    write_file(&paths.meta(), json.as_bytes())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile, ModelLoadError> {
    let path = paths.meta();
    let buf = read_file(&path)?;
    serde_json::from_slice(&buf).map_err(|source| ModelLoadError::Meta { path, source })
}

/// Write the whole artifact: vocabulary, matrix, corpus-order titles and meta.
pub fn save_model(paths: &IndexPaths, model: &VocabularyModel, titles: &[String], created_at: String) -> Result<()> {
    if model.num_docs() != titles.len() {
        anyhow::bail!("{} matrix rows but {} titles", model.num_docs(), titles.len());
    }
    save_vocabulary(paths, &model.vocabulary)?;
    save_matrix(paths, &model.matrix)?;
    save_titles(paths, titles)?;
    let meta = MetaFile {
        num_docs: titles.len() as u32,
        num_terms: model.vocabulary.num_terms() as u32,
        created_at,
        version: FORMAT_VERSION,
        smoothed_idf: model.vocabulary.options.smoothed_idf,
    };
    save_meta(paths, &meta)
}

/// Load and validate the artifact. Any missing file, decode failure or
/// dimension mismatch is an error; there is no partial load.
pub fn load_model(paths: &IndexPaths) -> Result<(VocabularyModel, Vec<String>, MetaFile), ModelLoadError> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        return Err(ModelLoadError::Version { found: meta.version, expected: FORMAT_VERSION });
    }
    let vocabulary = load_vocabulary(paths)?;
    let matrix = load_matrix(paths)?;
    let titles = load_titles(paths)?;
    let model = VocabularyModel { vocabulary, matrix };
    model.validate(&titles)?;
    if meta.num_docs as usize != titles.len() || meta.num_terms as usize != model.vocabulary.num_terms() {
        return Err(ModelLoadError::Dimensions(format!(
            "meta.json declares {} docs / {} terms, artifact has {} / {}",
            meta.num_docs,
            meta.num_terms,
            titles.len(),
            model.vocabulary.num_terms()
        )));
    }
    tracing::info!(num_docs = meta.num_docs, num_terms = meta.num_terms, created_at = %meta.created_at, "loaded model");
    Ok((model, titles, meta))
}
