//! The [`Catalog`] type: an insertion-ordered name→factory map.

use indexmap::IndexMap;

use crate::error::CatalogError;

/// A factory stored in a catalog.
///
/// Receives the instance name the caller chose and returns a freshly
/// constructed, owned instance of the abstract base `B`. Factories must
/// construct the instance with exactly the name they are given — the tree
/// layer relies on this when inserting catalog-built children.
pub type Factory<B> = Box<dyn Fn(&str) -> Box<B> + Send + Sync>;

/// Name→factory map for one abstract base.
///
/// Keys are the catalog keys that appear as tags in input documents.
/// Entries are immutable once inserted and never removed; registration is
/// duplicate-checked, never silently overwritten.
///
/// # Thread model
///
/// Registration happens during single-threaded startup, strictly before
/// any `create` call. A built catalog is `Send + Sync` (factories are),
/// so independent tree builders may share `&Catalog` and create
/// concurrently — creation never mutates the map.
///
/// # Examples
///
/// ```
/// use strata_catalog::Catalog;
///
/// trait Importer: Send { fn format(&self) -> &'static str; }
/// struct Vtk;
/// impl Importer for Vtk { fn format(&self) -> &'static str { "vtk" } }
///
/// let mut catalog: Catalog<dyn Importer> = Catalog::new();
/// catalog.register("VTKMesh", |_name| Box::new(Vtk)).unwrap();
///
/// let importer = catalog.create("VTKMesh", "mainMesh").unwrap();
/// assert_eq!(importer.format(), "vtk");
/// assert!(catalog.create("Unstructured", "x").is_err());
/// ```
pub struct Catalog<B: ?Sized> {
    entries: IndexMap<String, Factory<B>>,
}

impl<B: ?Sized> Catalog<B> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert a factory under `name`.
    ///
    /// Fails with [`CatalogError::DuplicateName`] if the key is already
    /// taken; the existing factory is left untouched.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), CatalogError>
    where
        F: Fn(&str) -> Box<B> + Send + Sync + 'static,
    {
        if self.entries.contains_key(name) {
            return Err(CatalogError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    /// Construct a new instance from the factory registered under `name`.
    ///
    /// `instance_name` is forwarded to the factory and becomes the name of
    /// the constructed object. Fails with [`CatalogError::UnknownName`] —
    /// carrying the full list of registered keys — if no factory exists;
    /// a missing key never yields a null or default instance.
    pub fn create(&self, name: &str, instance_name: &str) -> Result<Box<B>, CatalogError> {
        match self.entries.get(name) {
            Some(factory) => Ok(factory(instance_name)),
            None => Err(CatalogError::UnknownName {
                requested: name.to_string(),
                known: self.entries.keys().cloned().collect(),
            }),
        }
    }

    /// Iterate over registered keys in registration order.
    ///
    /// Intended for diagnostics and self-documentation; the order is
    /// stable across calls.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: ?Sized> Default for Catalog<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized> std::fmt::Debug for Catalog<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: Send {
        fn catalog_name(&self) -> &'static str;
        fn instance_name(&self) -> &str;
    }

    struct Alpha {
        name: String,
    }

    impl Shape for Alpha {
        fn catalog_name(&self) -> &'static str {
            "Alpha"
        }
        fn instance_name(&self) -> &str {
            &self.name
        }
    }

    struct Beta {
        name: String,
    }

    impl Shape for Beta {
        fn catalog_name(&self) -> &'static str {
            "Beta"
        }
        fn instance_name(&self) -> &str {
            &self.name
        }
    }

    fn shape_catalog() -> Catalog<dyn Shape> {
        let mut catalog: Catalog<dyn Shape> = Catalog::new();
        catalog
            .register("Alpha", |name| {
                Box::new(Alpha {
                    name: name.to_string(),
                })
            })
            .unwrap();
        catalog
            .register("Beta", |name| {
                Box::new(Beta {
                    name: name.to_string(),
                })
            })
            .unwrap();
        catalog
    }

    #[test]
    fn create_returns_matching_concrete_type() {
        let catalog = shape_catalog();
        let shape = catalog.create("Alpha", "a1").unwrap();
        assert_eq!(shape.catalog_name(), "Alpha");
        assert_eq!(shape.instance_name(), "a1");

        let shape = catalog.create("Beta", "b1").unwrap();
        assert_eq!(shape.catalog_name(), "Beta");
    }

    #[test]
    fn every_registered_name_creates() {
        let catalog = shape_catalog();
        for name in catalog.names().map(str::to_string).collect::<Vec<_>>() {
            let shape = catalog.create(&name, "probe").unwrap();
            assert_eq!(shape.catalog_name(), name);
        }
    }

    #[test]
    fn unknown_name_fails_with_known_keys() {
        let catalog = shape_catalog();
        match catalog.create("Gamma", "g1") {
            Err(CatalogError::UnknownName { requested, known }) => {
                assert_eq!(requested, "Gamma");
                assert_eq!(known, vec!["Alpha".to_string(), "Beta".to_string()]);
            }
            other => panic!("expected UnknownName, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn duplicate_registration_keeps_first_factory() {
        let mut catalog = shape_catalog();
        let err = catalog
            .register("Alpha", |name| {
                Box::new(Beta {
                    name: name.to_string(),
                })
            })
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateName {
                name: "Alpha".to_string()
            }
        );

        // The original factory still answers for the key.
        let shape = catalog.create("Alpha", "a2").unwrap();
        assert_eq!(shape.catalog_name(), "Alpha");
    }

    #[test]
    fn names_preserve_registration_order() {
        let mut catalog: Catalog<dyn Shape> = Catalog::new();
        for key in ["Zeta", "Alpha", "Mu"] {
            catalog
                .register(key, |name| {
                    Box::new(Alpha {
                        name: name.to_string(),
                    })
                })
                .unwrap();
        }
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn failed_duplicate_does_not_perturb_order() {
        let mut catalog = shape_catalog();
        let _ = catalog.register("Alpha", |name| {
            Box::new(Alpha {
                name: name.to_string(),
            })
        });
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn empty_catalog_reports_no_keys() {
        let catalog: Catalog<dyn Shape> = Catalog::new();
        assert!(catalog.is_empty());
        match catalog.create("Anything", "x") {
            Err(CatalogError::UnknownName { known, .. }) => assert!(known.is_empty()),
            other => panic!("expected UnknownName, got {:?}", other.map(|_| ())),
        }
    }

    mod laws {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn names_mirror_registration_sequence(
                keys in prop::collection::hash_set("[A-Z][a-zA-Z]{1,12}", 0..16)
            ) {
                let mut catalog: Catalog<dyn Shape> = Catalog::new();
                let keys: Vec<String> = keys.into_iter().collect();
                for key in &keys {
                    catalog
                        .register(key, |name| {
                            Box::new(Alpha {
                                name: name.to_string(),
                            })
                        })
                        .unwrap();
                }
                let names: Vec<String> = catalog.names().map(str::to_string).collect();
                prop_assert_eq!(names, keys);
                prop_assert_eq!(catalog.is_empty(), catalog.len() == 0);
            }

            #[test]
            fn create_succeeds_iff_registered(
                registered in "[A-Z][a-z]{1,8}",
                probe in "[A-Z][a-z]{1,8}",
            ) {
                let mut catalog: Catalog<dyn Shape> = Catalog::new();
                catalog
                    .register(&registered, |name| {
                        Box::new(Alpha {
                            name: name.to_string(),
                        })
                    })
                    .unwrap();
                prop_assert_eq!(
                    catalog.create(&probe, "x").is_ok(),
                    probe == registered
                );
            }
        }
    }

    #[test]
    fn shared_reference_creates_concurrently() {
        let catalog = std::sync::Arc::new(shape_catalog());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let catalog = std::sync::Arc::clone(&catalog);
                std::thread::spawn(move || {
                    let shape = catalog.create("Alpha", &format!("a{i}")).unwrap();
                    assert_eq!(shape.catalog_name(), "Alpha");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
