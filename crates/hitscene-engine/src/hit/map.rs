use std::ops::Range;
use std::rc::Rc;

use slotmap::SecondaryMap;

use crate::scene::{resolve_instance_count, ComponentKey, DrawCallEntry};

use super::{Generation, HitId, HitSample, MAX_HIT_ID};

/// Contiguous hit ids covering every instance of one drawable object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HitSpan {
    pub first: HitId,
    pub count: u32,
    /// Position of the object inside its entry's draw props.
    pub object_index: usize,
}

impl HitSpan {
    #[inline]
    pub fn contains(&self, id: HitId) -> bool {
        let offset = id.get().wrapping_sub(self.first.get());
        id >= self.first && offset < self.count
    }

    /// Ids of this span in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = HitId> + use<> {
        let first = self.first.get();
        (first..first + self.count).filter_map(HitId::new)
    }
}

/// Draw-call state captured at assignment time, so ids resolve against the
/// data of the pass that produced them.
struct FrameEntry<O> {
    component: ComponentKey,
    draw_props: Rc<[O]>,
    instanced: bool,
    spans: Range<usize>,
}

/// Result of decoding a hit id.
pub struct HitResolution<O> {
    pub component: ComponentKey,
    draw_props: Rc<[O]>,
    pub object_index: usize,
    /// `Some` only when the owning draw call is instanced; `Some(0)` is the
    /// first instance, not "no instance".
    pub instance_index: Option<u32>,
}

impl<O> HitResolution<O> {
    /// The drawable object the id was assigned to.
    #[inline]
    pub fn object(&self) -> &O {
        &self.draw_props[self.object_index]
    }

    /// All objects of the owning draw call, as of the resolving pass.
    #[inline]
    pub fn draw_props(&self) -> &Rc<[O]> {
        &self.draw_props
    }
}

impl<O> std::fmt::Debug for HitResolution<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitResolution")
            .field("component", &self.component)
            .field("object_index", &self.object_index)
            .field("instance_index", &self.instance_index)
            .finish()
    }
}

/// Hit-id assignment of one render pass and its inverse.
///
/// Ids are handed out from 1 in iteration order of the entries passed to
/// [`HitMap::assign`] (paint order), skipping non-interactive entries. Each
/// object receives as many consecutive ids as its instance count. The same
/// entries with the same counts always produce the same ids.
pub struct HitMap<O> {
    generation: Generation,
    entries: Vec<FrameEntry<O>>,
    spans: Vec<HitSpan>,
    span_entry: Vec<usize>,
    by_component: SecondaryMap<ComponentKey, usize>,
    assigned: u32,
    truncated: bool,
}

impl<O> HitMap<O> {
    /// Map with no ids, e.g. before the first render.
    pub fn empty(generation: Generation) -> Self {
        Self {
            generation,
            entries: Vec::new(),
            spans: Vec::new(),
            span_entry: Vec::new(),
            by_component: SecondaryMap::new(),
            assigned: 0,
            truncated: false,
        }
    }

    /// Assigns ids to every instance of every interactive entry, in iteration order.
    ///
    /// Once [`MAX_HIT_ID`] is reached the remaining objects get no ids; they are
    /// still drawn but cannot be picked.
    pub fn assign<'a, C: 'a>(
        generation: Generation,
        entries: impl IntoIterator<Item = &'a DrawCallEntry<O, C>>,
    ) -> Self
    where
        O: 'a,
    {
        let mut map = Self::empty(generation);

        for entry in entries.into_iter().filter(|e| e.interactive) {
            let span_start = map.spans.len();
            let entry_index = map.entries.len();

            for (object_index, object) in entry.draw_props.iter().enumerate() {
                let count = resolve_instance_count(object, entry.instance_count.as_ref());
                let Some(first) = map.reserve(count) else {
                    break;
                };
                map.spans.push(HitSpan { first, count, object_index });
                map.span_entry.push(entry_index);
            }

            map.by_component.insert(entry.component, entry_index);
            map.entries.push(FrameEntry {
                component: entry.component,
                draw_props: Rc::clone(&entry.draw_props),
                instanced: entry.is_instanced(),
                spans: span_start..map.spans.len(),
            });
        }

        if map.truncated {
            log::warn!(
                "{}: hit ids exhausted at {}; remaining objects are not pickable",
                generation,
                MAX_HIT_ID
            );
        }
        log::trace!("{}: assigned {} hit ids over {} entries", generation, map.assigned, map.entries.len());

        map
    }

    fn reserve(&mut self, count: u32) -> Option<HitId> {
        if self.truncated {
            return None;
        }
        let end = self.assigned.checked_add(count).filter(|&end| end <= MAX_HIT_ID);
        let Some(end) = end else {
            self.truncated = true;
            return None;
        };
        let first = HitId::new(self.assigned + 1)?;
        self.assigned = end;
        Some(first)
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Total number of ids assigned in this pass.
    #[inline]
    pub fn len(&self) -> u32 {
        self.assigned
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    /// Whether [`MAX_HIT_ID`] cut the assignment short.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Spans of one component's draw call; empty when it is not interactive.
    pub fn spans_for(&self, component: ComponentKey) -> &[HitSpan] {
        match self.by_component.get(component) {
            Some(&i) => &self.spans[self.entries[i].spans.clone()],
            None => &[],
        }
    }

    /// Decodes an id of this pass. Samples from any other generation resolve to `None`.
    pub fn resolve(&self, sample: HitSample) -> Option<HitResolution<O>> {
        if sample.generation != self.generation {
            return None;
        }
        let span_index = self.find_span(sample.id)?;
        let span = &self.spans[span_index];
        let entry = &self.entries[self.span_entry[span_index]];

        let instance_index = entry.instanced.then(|| sample.id.get() - span.first.get());

        Some(HitResolution {
            component: entry.component,
            draw_props: Rc::clone(&entry.draw_props),
            object_index: span.object_index,
            instance_index,
        })
    }

    /// Picks the front-most of several samples of this pass.
    ///
    /// Ids follow paint order, so the highest valid id is the one drawn last.
    pub fn topmost(&self, samples: impl IntoIterator<Item = HitSample>) -> Option<HitSample> {
        samples
            .into_iter()
            .filter(|s| s.generation == self.generation && self.find_span(s.id).is_some())
            .max_by_key(|s| s.id)
    }

    fn find_span(&self, id: HitId) -> Option<usize> {
        let after = self.spans.partition_point(|s| s.first <= id);
        let index = after.checked_sub(1)?;
        self.spans[index].contains(id).then_some(index)
    }
}
