use crate::domain::{ports::VectorStore, Document, DomainError, Embedding, RetrievalHit};
use crate::infrastructure::vector_store::FlatL2Index;

/// A built index together with the document text behind each row.
///
/// Row `i` of the index belongs to `metadata[i]`; construction rejects
/// mismatched lengths and the pair is never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndexStore {
    index: FlatL2Index,
    metadata: Vec<String>,
}

impl FlatIndexStore {
    pub fn from_parts(index: FlatL2Index, metadata: Vec<String>) -> Result<Self, DomainError> {
        index.validate()?;
        if index.len() != metadata.len() {
            return Err(DomainError::consistency(format!(
                "index holds {} vectors but metadata holds {} documents",
                index.len(),
                metadata.len()
            )));
        }
        Ok(Self { index, metadata })
    }

    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }
}

impl VectorStore for FlatIndexStore {
    fn dimension(&self) -> usize {
        self.index.dimension()
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn search(&self, query: &Embedding, top_k: usize) -> Result<Vec<RetrievalHit>, DomainError> {
        if query.dimension() != self.index.dimension() {
            return Err(DomainError::dimension(
                self.index.dimension(),
                query.dimension(),
            ));
        }

        let k = top_k.min(self.len());
        self.index
            .search(query.as_slice(), k)
            .into_iter()
            .map(|(position, distance)| {
                let text = self.metadata.get(position).ok_or_else(|| {
                    DomainError::consistency(format!(
                        "search returned position {position} for {} documents",
                        self.metadata.len()
                    ))
                })?;
                Ok(RetrievalHit {
                    document: Document::new(position, text.clone()),
                    distance,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FlatIndexStore {
        let mut index = FlatL2Index::new(3);
        for v in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
            index.add(&Embedding::new(v.to_vec())).unwrap();
        }
        FlatIndexStore::from_parts(
            index,
            vec!["python".into(), "recruiting".into(), "design".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_search_maps_to_documents() {
        let hits = store()
            .search(&Embedding::new(vec![0.9, 0.1, 0.0]), 2)
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document, Document::new(0, "python"));
        assert_eq!(hits[1].document.text, "recruiting");
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn test_top_k_clamped() {
        let hits = store().search(&Embedding::new(vec![0.0, 0.0, 0.0]), 50).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = store().search(&Embedding::new(vec![1.0, 0.0]), 1).unwrap_err();
        assert!(matches!(
            err,
            DomainError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_out_of_range_position_reported() {
        let mut index = FlatL2Index::new(1);
        index.add(&Embedding::new(vec![1.0])).unwrap();
        index.add(&Embedding::new(vec![2.0])).unwrap();
        let store = FlatIndexStore {
            index,
            metadata: vec!["only".into()],
        };

        let err = store.search(&Embedding::new(vec![2.0]), 2).unwrap_err();
        assert!(matches!(err, DomainError::InternalConsistency(_)));
    }

    #[test]
    fn test_misaligned_parts_rejected() {
        let mut index = FlatL2Index::new(1);
        index.add(&Embedding::new(vec![1.0])).unwrap();

        let err = FlatIndexStore::from_parts(index, vec![]).unwrap_err();
        assert!(matches!(err, DomainError::InternalConsistency(_)));
    }

    #[test]
    fn test_trailing_partial_row_rejected() {
        let index: FlatL2Index =
            serde_json::from_str(r#"{"dimension":2,"data":[1.0,0.0,0.5]}"#).unwrap();

        let err = FlatIndexStore::from_parts(index, vec!["a".into()]).unwrap_err();
        assert!(matches!(err, DomainError::InternalConsistency(_)));
    }
}
