//! Target map types.
//!
//! A [`TargetMap`] associates environment identifiers with the applications to
//! render in them. [`Targets`] distinguishes "no filtering at all" from an
//! explicit (possibly empty) selection.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::Serialize;

use crate::consts::ALL_TOKEN;

/// Which applications of an environment are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AppSelector {
  /// Every application of the environment.
  #[default]
  All,
  /// Only the listed applications, in first-seen order, without duplicates.
  Only(Vec<String>),
}

impl AppSelector {
  /// Build a selector from application names.
  ///
  /// Duplicates are dropped keeping the first occurrence. A list that contains
  /// the `ALL` token collapses to [`AppSelector::All`].
  pub fn from_names<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut apps: Vec<String> = Vec::new();
    for name in names {
      let name = name.into();
      if name == ALL_TOKEN {
        return AppSelector::All;
      }
      if !apps.contains(&name) {
        apps.push(name);
      }
    }
    AppSelector::Only(apps)
  }

  pub fn is_all(&self) -> bool {
    matches!(self, AppSelector::All)
  }

  /// Whether the application `name` is selected.
  pub fn includes(&self, name: &str) -> bool {
    match self {
      AppSelector::All => true,
      AppSelector::Only(apps) => apps.iter().any(|a| a == name),
    }
  }

  /// Merge another selector into this one. `All` absorbs everything.
  pub fn merge(&mut self, other: AppSelector) {
    match (&mut *self, other) {
      (AppSelector::All, _) => {}
      (this, AppSelector::All) => *this = AppSelector::All,
      (AppSelector::Only(apps), AppSelector::Only(more)) => {
        for app in more {
          if !apps.contains(&app) {
            apps.push(app);
          }
        }
      }
    }
  }
}

/// Mapping from environment identifier to selected applications.
///
/// Iteration is ordered by environment identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetMap(BTreeMap<String, AppSelector>);

impl TargetMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the selector of `env`, replacing any previous one.
  pub fn insert(&mut self, env: impl Into<String>, apps: AppSelector) {
    self.0.insert(env.into(), apps);
  }

  /// Select every application of `env`.
  pub fn add_env(&mut self, env: impl Into<String>) {
    self.merge_env(env, AppSelector::All);
  }

  /// Add a single application to `env`, unless all of its applications are
  /// already selected.
  pub fn add_app(&mut self, env: impl Into<String>, app: impl Into<String>) {
    self.merge_env(env, AppSelector::Only(vec![app.into()]));
  }

  /// Merge `apps` into the selector of `env`.
  pub fn merge_env(&mut self, env: impl Into<String>, apps: AppSelector) {
    match self.0.entry(env.into()) {
      btree_map::Entry::Vacant(entry) => {
        entry.insert(apps);
      }
      btree_map::Entry::Occupied(mut entry) => entry.get_mut().merge(apps),
    }
  }

  pub fn get(&self, env: &str) -> Option<&AppSelector> {
    self.0.get(env)
  }

  pub fn contains_env(&self, env: &str) -> bool {
    self.0.contains_key(env)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> btree_map::Iter<'_, String, AppSelector> {
    self.0.iter()
  }

  pub fn envs(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

impl<'a> IntoIterator for &'a TargetMap {
  type Item = (&'a String, &'a AppSelector);
  type IntoIter = btree_map::Iter<'a, String, AppSelector>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl<K: Into<String>> FromIterator<(K, AppSelector)> for TargetMap {
  fn from_iter<T: IntoIterator<Item = (K, AppSelector)>>(iter: T) -> Self {
    let mut map = TargetMap::new();
    for (env, apps) in iter {
      map.merge_env(env, apps);
    }
    map
  }
}

/// The resolved set of things to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
  /// No filtering: every environment and application.
  All,
  /// An explicit selection. May be empty.
  Selected(TargetMap),
}

impl Targets {
  pub fn is_all(&self) -> bool {
    matches!(self, Targets::All)
  }

  pub fn selected(&self) -> Option<&TargetMap> {
    match self {
      Targets::All => None,
      Targets::Selected(map) => Some(map),
    }
  }
}

impl fmt::Display for Targets {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Targets::All => write!(f, "{}", ALL_TOKEN),
      Targets::Selected(map) => {
        let parts: Vec<String> = map
          .iter()
          .map(|(env, apps)| match apps {
            AppSelector::All => format!("{}:{}", env, ALL_TOKEN),
            AppSelector::Only(apps) => format!("{}:{}", env, apps.join(",")),
          })
          .collect();
        write!(f, "{}", parts.join(" "))
      }
    }
  }
}
