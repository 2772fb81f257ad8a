use crate::astar::AStarPlanner;
use crate::bounds::BoundingBox;
use crate::config::{OctreeConfig, SearchConfig};
use crate::occupancy::Occupancy;
use crate::octree::OccupancyOctree;
use crate::point::Point;
use js_sys::{Array, Float64Array};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initThreads)]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_OCCUPANCY: &'static str = r#"
export const OCCUPANCY_FREE = 0;
export const OCCUPANCY_OBSTACLE = 1;
export const OCCUPANCY_LABEL_START = 2;
"#;

/// Number of values per entry of [`OctreeWasm::leaf_boxes`].
const LEAF_STRIDE: usize = 7;

/// WASM wrapper around an occupancy octree and its planner.
#[wasm_bindgen(js_name = Octree)]
pub struct OctreeWasm {
    inner: OccupancyOctree,
    search: SearchConfig,
}

#[wasm_bindgen(js_class = Octree)]
impl OctreeWasm {
    #[wasm_bindgen(constructor)]
    pub fn new(
        cx: f64,
        cy: f64,
        cz: f64,
        hx: f64,
        hy: f64,
        hz: f64,
        min_volume: f64,
    ) -> Result<OctreeWasm, JsValue> {
        let config = OctreeConfig::new(Point::new(cx, cy, cz), Point::new(hx, hy, hz), min_volume);
        let inner = OccupancyOctree::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(OctreeWasm {
            inner,
            search: SearchConfig::default(),
        })
    }

    #[wasm_bindgen(js_name = setRegion)]
    pub fn set_region(&mut self, cx: f64, cy: f64, cz: f64, hx: f64, hy: f64, hz: f64, code: u32) {
        let region = BoundingBox::new(Point::new(cx, cy, cz), Point::new(hx, hy, hz));
        self.inner.set_region(&region, Occupancy::from_code(code));
    }

    #[wasm_bindgen(js_name = setObstacle)]
    pub fn set_obstacle(&mut self, cx: f64, cy: f64, cz: f64, hx: f64, hy: f64, hz: f64) {
        self.set_region(cx, cy, cz, hx, hy, hz, Occupancy::Obstacle.code());
    }

    /// Occupancy code at a point, or `undefined` outside the volume.
    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> Option<u32> {
        self.inner.get_value(&Point::new(x, y, z)).map(|tag| tag.code())
    }

    #[wasm_bindgen(js_name = leafCount)]
    pub fn leaf_count(&self) -> usize {
        self.inner.leaf_count()
    }

    /// All leaves flattened as `[cx, cy, cz, hx, hy, hz, code, ...]`.
    #[wasm_bindgen(js_name = leafBoxes)]
    pub fn leaf_boxes(&self) -> Float64Array {
        let leaves = self.inner.leaves();
        let mut data = Vec::with_capacity(leaves.len() * LEAF_STRIDE);
        for leaf in &leaves {
            data.extend_from_slice(&leaf.bounds.center.to_array());
            data.extend_from_slice(&leaf.bounds.half_extent.to_array());
            data.push(leaf.tag.code() as f64);
        }
        Float64Array::from(&data[..])
    }

    #[wasm_bindgen(js_name = setMaxExpansions)]
    pub fn set_max_expansions(&mut self, max_expansions: usize) {
        self.search.max_expansions = max_expansions.max(1);
    }

    #[wasm_bindgen(js_name = setCornerCandidates)]
    pub fn set_corner_candidates(&mut self, enabled: bool) {
        self.search.corner_candidates = enabled;
    }

    /// Path from `start` to `goal` (both `[x, y, z]` arrays), flattened as
    /// `[x, y, z, ...]`. Empty when no path exists.
    #[wasm_bindgen(js_name = findPath)]
    pub fn find_path(&self, start: JsValue, goal: JsValue) -> Result<Float64Array, JsValue> {
        let start = parse_js_point(&start).ok_or_else(|| JsValue::from_str("start must be [x, y, z]"))?;
        let goal = parse_js_point(&goal).ok_or_else(|| JsValue::from_str("goal must be [x, y, z]"))?;

        let result = AStarPlanner::new(&self.inner, self.search.clone()).find_path(start, goal);
        let data: Vec<f64> = result.path.iter().flat_map(|p| p.to_array()).collect();
        Ok(Float64Array::from(&data[..]))
    }
}

fn parse_js_point(val: &JsValue) -> Option<Point> {
    let arr = val.dyn_ref::<Array>()?;
    if arr.length() < 3 {
        return None;
    }
    Some(Point::new(
        arr.get(0).as_f64()?,
        arr.get(1).as_f64()?,
        arr.get(2).as_f64()?,
    ))
}
