//! Page sections
//!
//! A [`Section`] owns one [`AnimationController`] and fans its state out to a
//! header track, a staggered group of items, and optional container-fade,
//! call-to-action and side-panel tracks. Rendering is a pure read: [`Section::frame`] samples every
//! node at `now_ms` and composes pointer emphasis on top.

use std::fmt;

use reveal_animation::{Entrance, Pose};
use reveal_core::{
    AnimationController, AnimationState, ControllerTransition, PointerEvent, RegionId,
    RevealResult, VisibilityRegion,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::SectionConfig;
use crate::content::{AsideContent, CtaContent, HeaderContent, SectionItem};
use crate::interactive::InteractiveLayer;
use crate::motion::{MotionTrack, StaggeredGroup};
use crate::nav::NavAction;

/// Stable identity of a node within its section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Header,
    Item(usize),
    Cta,
    Aside,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Header => write!(f, "header"),
            NodeKey::Item(index) => write!(f, "item-{index}"),
            NodeKey::Cta => write!(f, "cta"),
            NodeKey::Aside => write!(f, "aside"),
        }
    }
}

/// What a rendered node displays
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeContent<'a> {
    Header(&'a HeaderContent),
    Item(&'a SectionItem),
    Cta(&'a CtaContent),
    Aside(&'a AsideContent),
}

/// One node with its composed pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderedNode<'a> {
    pub key: NodeKey,
    pub pose: Pose,
    pub content: NodeContent<'a>,
}

/// Everything a host needs to draw one section for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct SectionFrame<'a> {
    pub id: &'a str,
    pub region: Option<RegionId>,
    pub state: AnimationState,
    /// Opacity of the element wrapping the items; children draw inside it
    pub container_opacity: f32,
    pub nodes: SmallVec<[RenderedNode<'a>; 8]>,
}

impl<'a> SectionFrame<'a> {
    pub fn node(&self, key: NodeKey) -> Option<&RenderedNode<'a>> {
        self.nodes.iter().find(|node| node.key == key)
    }

    pub fn pose(&self, key: NodeKey) -> Option<Pose> {
        self.node(key).map(|node| node.pose)
    }
}

/// One page section and its animation state
#[derive(Debug)]
pub struct Section {
    config: SectionConfig,
    region: Option<RegionId>,
    controller: AnimationController,
    container: Option<MotionTrack>,
    header: MotionTrack,
    group: StaggeredGroup,
    cta: Option<MotionTrack>,
    aside: Option<MotionTrack>,
    emphasis: FxHashMap<NodeKey, InteractiveLayer>,
}

impl Section {
    pub fn new(config: SectionConfig) -> RevealResult<Self> {
        config.validate()?;

        let mut emphasis = FxHashMap::default();
        for (index, item) in config.items.iter().enumerate() {
            let layer = match item {
                SectionItem::Card(_) => config.item_hover,
                SectionItem::Submit { .. } => config.submit_hover,
                SectionItem::Field(_) => None,
            };
            if let Some(layer) = layer {
                emphasis.insert(NodeKey::Item(index), InteractiveLayer::new(layer));
            }
        }
        if let Some(hover) = config.cta.as_ref().and_then(|cta| cta.hover) {
            emphasis.insert(NodeKey::Cta, InteractiveLayer::new(hover));
        }

        Ok(Self {
            region: None,
            controller: AnimationController::new(config.repeatable),
            container: config.container.map(|transition| {
                MotionTrack::new(
                    Entrance::new(Pose::VISIBLE.with_opacity(0.0), transition),
                    0,
                )
            }),
            header: config.header.motion.track(),
            group: config.group(),
            cta: config.cta.as_ref().map(|cta| cta.motion.track()),
            aside: config.aside.as_ref().map(|aside| aside.motion.track()),
            emphasis,
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &SectionConfig {
        &self.config
    }

    /// Observation parameters for registering this section with an observer
    pub fn visibility_region(&self) -> RevealResult<VisibilityRegion> {
        self.config.region()
    }

    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    /// Record the observer handle this section is tracked under
    pub fn bind(&mut self, region: RegionId) {
        self.region = Some(region);
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn state(&self) -> AnimationState {
        self.controller.state()
    }

    pub fn group(&self) -> &StaggeredGroup {
        &self.group
    }

    /// Apply a visibility report
    pub fn on_visibility(&mut self, visible: bool, now_ms: u64) -> Option<ControllerTransition> {
        let transition = self.controller.on_visibility(visible, now_ms);
        if let Some(transition) = transition {
            debug!(section = %self.config.id, ?transition, "section transition");
        }
        transition
    }

    /// Enter `Visible` without waiting for the observer
    pub fn start(&mut self, now_ms: u64) -> Option<ControllerTransition> {
        self.controller.start(now_ms)
    }

    /// Route pointer input to a node's emphasis layer; false if the node has none
    pub fn on_pointer(&mut self, key: NodeKey, event: PointerEvent) -> bool {
        match self.emphasis.get_mut(&key) {
            Some(layer) => layer.on_pointer(event),
            None => false,
        }
    }

    /// Advance emphasis motion by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for layer in self.emphasis.values_mut() {
            layer.tick(dt);
        }
    }

    /// Navigation requested by clicking `key`
    pub fn click(&self, key: NodeKey) -> Option<NavAction> {
        match key {
            NodeKey::Cta => self.config.cta.as_ref().map(|cta| cta.content.action.clone()),
            _ => None,
        }
    }

    fn compose(&self, key: NodeKey, pose: Pose) -> Pose {
        match self.emphasis.get(&key) {
            Some(layer) => layer.compose(pose),
            None => pose,
        }
    }

    /// Sample every node at `now_ms`
    pub fn frame(&self, now_ms: u64) -> SectionFrame<'_> {
        let state = self.controller.state();
        let elapsed = self.controller.elapsed_ms(now_ms);
        trace!(section = %self.config.id, ?state, ?elapsed, "sampling section");

        let mut nodes = SmallVec::new();
        nodes.push(RenderedNode {
            key: NodeKey::Header,
            pose: self.header.pose(state, elapsed),
            content: NodeContent::Header(&self.config.header.content),
        });

        let poses = self.group.poses(state, elapsed);
        for (index, (item, pose)) in self.config.items.iter().zip(poses).enumerate() {
            let key = NodeKey::Item(index);
            nodes.push(RenderedNode {
                key,
                pose: self.compose(key, pose),
                content: NodeContent::Item(item),
            });
        }

        if let (Some(track), Some(cta)) = (&self.cta, &self.config.cta) {
            nodes.push(RenderedNode {
                key: NodeKey::Cta,
                pose: self.compose(NodeKey::Cta, track.pose(state, elapsed)),
                content: NodeContent::Cta(&cta.content),
            });
        }

        if let (Some(track), Some(aside)) = (&self.aside, &self.config.aside) {
            nodes.push(RenderedNode {
                key: NodeKey::Aside,
                pose: track.pose(state, elapsed),
                content: NodeContent::Aside(&aside.content),
            });
        }

        let container_opacity = self
            .container
            .as_ref()
            .map_or(1.0, |track| track.pose(state, elapsed).opacity);

        SectionFrame {
            id: &self.config.id,
            region: self.region,
            state,
            container_opacity,
            nodes,
        }
    }

    /// Whether every entrance and emphasis animation has come to rest
    pub fn is_settled(&self, now_ms: u64) -> bool {
        let state = self.controller.state();
        if !state.is_visible() {
            return self.emphasis.values().all(InteractiveLayer::is_settled);
        }
        let elapsed = self.controller.elapsed_ms(now_ms);
        self.container
            .as_ref()
            .map_or(true, |track| track.is_settled(state, elapsed))
            && self.header.is_settled(state, elapsed)
            && self.group.is_settled(state, elapsed)
            && self
                .cta
                .as_ref()
                .map_or(true, |track| track.is_settled(state, elapsed))
            && self
                .aside
                .as_ref()
                .map_or(true, |track| track.is_settled(state, elapsed))
            && self.emphasis.values().all(InteractiveLayer::is_settled)
    }
}
