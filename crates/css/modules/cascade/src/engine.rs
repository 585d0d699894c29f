//! The cascade engine: collects matching declarations, resolves inheritance and
//! computes values lazily, caching them per element.
//!
//! Invalidation never walks the document. Each cached value remembers the
//! generation of every value it was derived from (the parent's value, the
//! element's own font size or color); a read re-validates those generations and
//! recomputes only what went stale.
//!
//! See: <https://www.w3.org/TR/CSS2/cascade.html>

use crate::context::CssContext;
use crate::error::CascadeError;
use crate::managers::{ComputeScope, ValueManager};
use crate::priority::{CascadePriority, Origin};
use crate::registry::{ValueManagerRegistry, registry};
use crate::style_map::{CascadedValue, Dependency, Relation, StyleEntry, StyleKey, StyleMap};
use crate::stylesheet::{Declaration, StyleRule, StyleSheet};
use css_selectors::{ElementAdapter, QualifiedName, Selector, Specificity};
use css_values_units::Value;
use log::{debug, warn};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// A declaration with its value created by the property's manager.
#[derive(Clone, Debug, PartialEq)]
struct CompiledDeclaration {
    index: usize,
    value: Value,
    important: bool,
}

#[derive(Clone, Debug)]
struct CompiledRule {
    selectors: Vec<(Selector, Specificity)>,
    declarations: Vec<CompiledDeclaration>,
    origin: Origin,
    source_order: u32,
}

/// A rule matching an element, as reported by [`CssEngine::matching_rules`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchedRule {
    /// Position of the rule in insertion order.
    pub source_order: u32,
    pub origin: Origin,
    /// Specificity of the rule's best matching selector.
    pub specificity: Specificity,
}

/// A computed value and the generation stamp it was stored with.
#[derive(Clone, Debug, PartialEq)]
struct Resolved {
    value: Value,
    generation: u64,
}

/// Cascade state of one document.
pub struct CssEngine {
    context: CssContext,
    registry: &'static ValueManagerRegistry,
    rules: Vec<CompiledRule>,
    inline_styles: HashMap<u64, Vec<CompiledDeclaration>>,
    /// Local names of every attribute some selector reads.
    selector_attributes: HashSet<String>,
    /// Whether any rule matches through another element.
    has_combinators: bool,
    styles: HashMap<StyleKey, StyleMap>,
    epoch: u64,
    generation: u64,
    next_source_order: u32,
    in_progress: HashSet<(StyleKey, usize)>,
}

impl Default for CssEngine {
    fn default() -> Self {
        Self::new(CssContext::default())
    }
}

impl CssEngine {
    pub fn new(context: CssContext) -> Self {
        Self {
            context,
            registry: registry(),
            rules: Vec::new(),
            inline_styles: HashMap::new(),
            selector_attributes: HashSet::new(),
            has_combinators: false,
            styles: HashMap::new(),
            epoch: 0,
            generation: 0,
            next_source_order: 0,
            in_progress: HashSet::new(),
        }
    }

    pub const fn context(&self) -> &CssContext {
        &self.context
    }

    pub const fn registry(&self) -> &'static ValueManagerRegistry {
        self.registry
    }

    /// Index of a longhand property.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.registry.index_of(name)
    }

    /// Creates the values of `declarations`, expanding shorthands. Rejected
    /// declarations are logged and returned; the rest are kept.
    fn compile_declarations(
        &self,
        declarations: &[Declaration],
        rejected: &mut Vec<CascadeError>,
    ) -> Vec<CompiledDeclaration> {
        let mut compiled = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            if let Err(error) = self.compile_declaration(declaration, &mut compiled) {
                warn!("ignoring declaration `{}`: {error}", declaration.property);
                rejected.push(error);
            }
        }
        compiled
    }

    fn compile_declaration(
        &self,
        declaration: &Declaration,
        compiled: &mut Vec<CompiledDeclaration>,
    ) -> Result<(), CascadeError> {
        let Declaration {
            property,
            value,
            important,
        } = declaration;
        if let Some(index) = self.registry.index_of(property) {
            let manager = self
                .registry
                .manager(index)
                .ok_or_else(|| CascadeError::UnknownProperty(property.clone()))?;
            compiled.push(CompiledDeclaration {
                index,
                value: manager.create_declared_value(value, &self.context)?,
                important: *important,
            });
            return Ok(());
        }
        let shorthand = self
            .registry
            .shorthand(property)
            .ok_or_else(|| CascadeError::UnknownProperty(property.clone()))?;
        let mut expanded = Vec::new();
        let mut handler = |name: &'static str, longhand_value: Value, longhand_important: bool| {
            expanded.push((name, longhand_value, longhand_important));
        };
        shorthand.set_values(
            self.registry,
            &self.context,
            &mut handler,
            value,
            *important,
        )?;
        for (name, longhand_value, longhand_important) in expanded {
            let index = self
                .registry
                .index_of(name)
                .ok_or_else(|| CascadeError::UnknownProperty(name.to_owned()))?;
            compiled.push(CompiledDeclaration {
                index,
                value: longhand_value,
                important: longhand_important,
            });
        }
        Ok(())
    }

    /// Adds a rule after every rule added so far. Returns the declarations that
    /// were rejected; the rule is kept with the remaining ones.
    pub fn add_rule(&mut self, origin: Origin, rule: &StyleRule) -> Vec<CascadeError> {
        let mut rejected = Vec::new();
        let declarations = self.compile_declarations(&rule.declarations, &mut rejected);
        for selector in &rule.selectors {
            selector.fill_attribute_set(&mut self.selector_attributes);
            self.has_combinators |= selector.has_combinator();
        }
        let source_order = self.next_source_order;
        self.next_source_order = self.next_source_order.saturating_add(1);
        self.rules.push(CompiledRule {
            selectors: rule
                .selectors
                .iter()
                .map(|selector| (selector.clone(), selector.specificity()))
                .collect(),
            declarations,
            origin,
            source_order,
        });
        self.bump_epoch();
        rejected
    }

    /// Adds every rule of `sheet`, returning all rejected declarations.
    pub fn add_stylesheet(&mut self, sheet: &StyleSheet) -> Vec<CascadeError> {
        let mut rejected = Vec::new();
        for rule in &sheet.rules {
            rejected.extend(self.add_rule(sheet.origin, rule));
        }
        debug!(
            "added {} {:?} rules, {} declarations rejected",
            sheet.rules.len(),
            sheet.origin,
            rejected.len()
        );
        rejected
    }

    /// Removes every rule; inline styles stay.
    pub fn clear_rules(&mut self) {
        self.rules.clear();
        self.selector_attributes.clear();
        self.has_combinators = false;
        self.bump_epoch();
    }

    /// Replaces the inline style of `element`. Returns the rejected declarations.
    pub fn set_inline_style<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        declarations: &[Declaration],
    ) -> Vec<CascadeError> {
        let mut rejected = Vec::new();
        let compiled = self.compile_declarations(declarations, &mut rejected);
        let key = adapter.unique_key(element);
        if compiled.is_empty() {
            self.inline_styles.remove(&key);
        } else {
            self.inline_styles.insert(key, compiled);
        }
        self.mark_element_stale(key);
        rejected
    }

    /// Marks `element` for re-collection. When rules match through other
    /// elements every cascade is re-collected instead.
    pub fn invalidate_element<A: ElementAdapter>(&mut self, adapter: &A, element: A::Handle) {
        if self.has_combinators {
            debug!("combinator rules present; invalidating every element");
            self.bump_epoch();
        } else {
            self.mark_element_stale(adapter.unique_key(element));
        }
    }

    /// Reacts to an attribute mutation. Returns whether anything was invalidated:
    /// attributes no selector reads are ignored.
    pub fn attribute_changed<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> bool {
        let bound = |name: &QualifiedName| {
            name.local_name == local_name && name.namespace_uri.as_deref() == namespace_uri
        };
        let relevant = self.selector_attributes.contains(local_name)
            || bound(&self.context.class_attribute)
            || bound(&self.context.id_attribute);
        if relevant {
            debug!("attribute `{local_name}` changed on element {}", adapter.unique_key(element));
            self.invalidate_element(adapter, element);
        }
        relevant
    }

    /// Reacts to the element entering or leaving a pseudo-class.
    pub fn pseudo_class_changed<A: ElementAdapter>(&mut self, adapter: &A, element: A::Handle) {
        self.invalidate_element(adapter, element);
    }

    /// Forgets everything cached for `element` and its inline style.
    pub fn element_removed<A: ElementAdapter>(&mut self, adapter: &A, element: A::Handle) {
        let key = adapter.unique_key(element);
        self.inline_styles.remove(&key);
        self.styles.retain(|style_key, _| style_key.element != key);
        if self.has_combinators {
            self.bump_epoch();
        }
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn mark_element_stale(&mut self, key: u64) {
        for (style_key, map) in &mut self.styles {
            if style_key.element == key {
                map.mark_stale();
            }
        }
    }

    /// Rules matching `element` (styled for `pseudo_element`) in cascade order
    /// of their normal declarations: origin, then specificity, then source
    /// order, the winning rule last.
    pub fn matching_rules<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
    ) -> Vec<MatchedRule> {
        let mut matched: Vec<MatchedRule> = self
            .rules
            .iter()
            .filter_map(|rule| {
                best_specificity(rule, adapter, element, pseudo_element).map(|specificity| {
                    MatchedRule {
                        source_order: rule.source_order,
                        origin: rule.origin,
                        specificity,
                    }
                })
            })
            .collect();
        matched.sort_by_key(|rule| {
            CascadePriority::new(rule.origin, false, rule.specificity, rule.source_order, 0)
        });
        matched
    }

    /// Winning declaration per property index.
    fn collect_cascade<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
    ) -> Vec<Option<CascadedValue>> {
        let mut winners: Vec<Option<CascadedValue>> = vec![None; self.registry.len()];
        let mut offer = |declaration: &CompiledDeclaration, priority: CascadePriority| {
            let Some(slot) = winners.get_mut(declaration.index) else {
                return;
            };
            if slot.as_ref().is_none_or(|current| priority > current.priority) {
                *slot = Some(CascadedValue {
                    value: declaration.value.clone(),
                    priority,
                });
            }
        };
        let mut matched = 0_usize;
        for rule in &self.rules {
            let Some(specificity) = best_specificity(rule, adapter, element, pseudo_element) else {
                continue;
            };
            matched += 1;
            for (position, declaration) in rule.declarations.iter().enumerate() {
                offer(
                    declaration,
                    CascadePriority::new(
                        rule.origin,
                        declaration.important,
                        specificity,
                        rule.source_order,
                        position as u32,
                    ),
                );
            }
        }
        if pseudo_element.is_none()
            && let Some(inline) = self.inline_styles.get(&adapter.unique_key(element))
        {
            for (position, declaration) in inline.iter().enumerate() {
                offer(
                    declaration,
                    CascadePriority::new(
                        Origin::Inline,
                        declaration.important,
                        Specificity::ZERO,
                        u32::MAX,
                        position as u32,
                    ),
                );
            }
        }
        debug!(
            "collected cascade for element {} ({pseudo_element:?}): {matched} matching rules",
            adapter.unique_key(element)
        );
        winners
    }

    /// Re-collects the cascade of `key` when it is stale, dropping entries
    /// whose winning declaration changed.
    fn refresh_cascade<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        key: &StyleKey,
    ) {
        let epoch = self.epoch;
        if self
            .styles
            .get(key)
            .is_some_and(|map| map.cascade_epoch() == Some(epoch))
        {
            return;
        }
        let winners = self.collect_cascade(adapter, element, key.pseudo_element.as_deref());
        let properties = self.registry.len();
        let dropped = self
            .styles
            .entry(key.clone())
            .or_insert_with(|| StyleMap::with_capacity(properties))
            .replace_cascade(winners, epoch);
        if dropped > 0 {
            debug!("{dropped} computed values of element {} changed", key.element);
        }
    }

    /// Computed value of `property` for `element` styled for `pseudo_element`.
    ///
    /// # Errors
    /// Returns `UnknownProperty` for names without a longhand manager, `Cycle`
    /// when the value depends on itself, and errors from computing the default.
    pub fn computed_value<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
        property: &str,
    ) -> Result<Value, CascadeError> {
        let index = self
            .registry
            .index_of(property)
            .ok_or_else(|| CascadeError::UnknownProperty(property.to_owned()))?;
        self.computed_value_at(adapter, element, pseudo_element, index)
    }

    /// Like [`CssEngine::computed_value`], by property index.
    ///
    /// # Errors
    /// As [`CssEngine::computed_value`].
    pub fn computed_value_at<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
        index: usize,
    ) -> Result<Value, CascadeError> {
        self.resolve(adapter, element, pseudo_element, index)
            .map(|resolved| resolved.value)
    }

    /// Every computed property of `element`, in property index order.
    ///
    /// # Errors
    /// Stops at the first property that fails to resolve.
    pub fn computed_style<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
    ) -> Result<Vec<(&'static str, Value)>, CascadeError> {
        let registry = self.registry;
        registry
            .managers()
            .enumerate()
            .map(|(index, manager)| {
                self.computed_value_at(adapter, element, pseudo_element, index)
                    .map(|value| (manager.property_name(), value))
            })
            .collect()
    }

    /// Cached style of `element`, as last resolved.
    pub fn style_map<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
    ) -> Option<&StyleMap> {
        self.styles
            .get(&StyleKey::new(adapter.unique_key(element), pseudo_element))
    }

    fn resolve<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
        index: usize,
    ) -> Result<Resolved, CascadeError> {
        let manager = self
            .registry
            .manager(index)
            .ok_or_else(|| CascadeError::UnknownProperty(format!("#{index}")))?;
        let key = StyleKey::new(adapter.unique_key(element), pseudo_element);
        let guard = (key.clone(), index);
        if self.in_progress.contains(&guard) {
            return Err(CascadeError::Cycle {
                property: manager.property_name(),
            });
        }
        self.refresh_cascade(adapter, element, &key);
        let cached = self
            .styles
            .get(&key)
            .and_then(|map| map.entry(index))
            .cloned();
        if let Some(entry) = cached {
            self.in_progress.insert(guard.clone());
            let current = self.dependencies_current(adapter, element, &entry.dependencies);
            self.in_progress.remove(&guard);
            if current {
                return Ok(Resolved {
                    value: entry.value,
                    generation: entry.generation,
                });
            }
        }
        self.in_progress.insert(guard.clone());
        let outcome = self.compute(adapter, element, &key, index, manager);
        self.in_progress.remove(&guard);
        outcome
    }

    /// Whether every recorded dependency still has the generation it had when read.
    fn dependencies_current<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        dependencies: &[Dependency],
    ) -> bool {
        for dependency in dependencies {
            let target = match dependency.relation {
                Relation::Parent => adapter.parent(element),
                Relation::Own => Some(element),
            };
            let Some(target) = target else {
                return false;
            };
            if adapter.unique_key(target) != dependency.target.element {
                return false;
            }
            let pseudo_element = dependency.target.pseudo_element.as_deref();
            match self.resolve(adapter, target, pseudo_element, dependency.index) {
                Ok(resolved) if resolved.generation == dependency.generation => {}
                _ => return false,
            }
        }
        true
    }

    fn compute<A: ElementAdapter>(
        &mut self,
        adapter: &A,
        element: A::Handle,
        key: &StyleKey,
        index: usize,
        manager: &'static dyn ValueManager,
    ) -> Result<Resolved, CascadeError> {
        let properties = self.registry.len();
        let map = self
            .styles
            .entry(key.clone())
            .or_insert_with(|| StyleMap::with_capacity(properties));
        map.begin_compute(index);
        let specified = map.cascaded(index).map(|cascaded| cascaded.value.clone());
        let mut scope = Resolver {
            engine: self,
            adapter,
            element,
            key,
            dependencies: SmallVec::new(),
        };
        let mut fell_back = false;
        let value = match specified {
            Some(value) if !value.is_inherit() => {
                match manager.compute_value(&mut scope, index, &value) {
                    Ok(computed) => computed,
                    Err(error) => {
                        warn!(
                            "{}: cannot compute `{value}` ({error}); using the default",
                            manager.property_name()
                        );
                        fell_back = true;
                        scope.compute_default(manager, index)?
                    }
                }
            }
            Some(_) => scope.inherit(manager, index)?,
            None if manager.is_inherited_property() => scope.inherit(manager, index)?,
            None => scope.compute_default(manager, index)?,
        };
        let dependencies = scope.dependencies;
        self.generation += 1;
        let generation = self.generation;
        if fell_back {
            // Not cached: the failed read left no dependency to re-validate.
            return Ok(Resolved { value, generation });
        }
        self.styles
            .entry(key.clone())
            .or_insert_with(|| StyleMap::with_capacity(properties))
            .store(
                index,
                StyleEntry {
                    value: value.clone(),
                    generation,
                    dependencies,
                },
            );
        Ok(Resolved { value, generation })
    }
}

fn best_specificity<A: ElementAdapter>(
    rule: &CompiledRule,
    adapter: &A,
    element: A::Handle,
    pseudo_element: Option<&str>,
) -> Option<Specificity> {
    rule.selectors
        .iter()
        .filter(|(selector, _)| selector.matches(adapter, element, pseudo_element))
        .map(|(_, specificity)| *specificity)
        .max()
}

/// [`ComputeScope`] of one (element, pseudo-element, property) computation.
struct Resolver<'engine, 'adapter, A: ElementAdapter> {
    engine: &'engine mut CssEngine,
    adapter: &'adapter A,
    element: A::Handle,
    key: &'engine StyleKey,
    dependencies: SmallVec<Dependency, 2>,
}

impl<A: ElementAdapter> Resolver<'_, '_, A> {
    fn compute_default(
        &mut self,
        manager: &dyn ValueManager,
        index: usize,
    ) -> Result<Value, CascadeError> {
        manager.compute_value(self, index, &manager.default_value())
    }

    /// The parent's value, or the computed default at the root.
    fn inherit(&mut self, manager: &dyn ValueManager, index: usize) -> Result<Value, CascadeError> {
        self.style_map().put_inherited(index, true);
        if let Some(value) = self.parent_value(index)? {
            return Ok(value);
        }
        self.compute_default(manager, index)
    }
}

impl<A: ElementAdapter> ComputeScope for Resolver<'_, '_, A> {
    fn context(&self) -> &CssContext {
        &self.engine.context
    }

    fn has_parent(&self) -> bool {
        self.adapter.parent(self.element).is_some()
    }

    fn parent_value(&mut self, index: usize) -> Result<Option<Value>, CascadeError> {
        let Some(parent) = self.adapter.parent(self.element) else {
            return Ok(None);
        };
        let resolved = self.engine.resolve(self.adapter, parent, None, index)?;
        self.dependencies.push(Dependency {
            relation: Relation::Parent,
            target: StyleKey::new(self.adapter.unique_key(parent), None),
            index,
            generation: resolved.generation,
        });
        Ok(Some(resolved.value))
    }

    fn own_value(&mut self, index: usize) -> Result<Value, CascadeError> {
        let pseudo_element = self.key.pseudo_element.as_deref();
        let resolved = self
            .engine
            .resolve(self.adapter, self.element, pseudo_element, index)?;
        self.dependencies.push(Dependency {
            relation: Relation::Own,
            target: self.key.clone(),
            index,
            generation: resolved.generation,
        });
        Ok(resolved.value)
    }

    fn style_map(&mut self) -> &mut StyleMap {
        let properties = self.engine.registry.len();
        self.engine
            .styles
            .entry(self.key.clone())
            .or_insert_with(|| StyleMap::with_capacity(properties))
    }
}
