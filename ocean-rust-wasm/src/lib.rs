use wasm_bindgen::prelude::*;
use ocean_core::{Ocean, OceanConfig, StillWater};

#[wasm_bindgen]
pub struct Simulation {
    inner: Ocean,
    ambient: Vec<f32>,
    obstruction: Vec<f32>,
    source: Vec<f32>,
}

#[wasm_bindgen]
impl Simulation {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vertices_x: usize,
        vertices_y: usize,
        width: f32,
        length: f32,
        height_scale: f32,
        dt: f32,
        alpha: f32,
        sigma: f32,
        wake_exponent: f32,
    ) -> Result<Simulation, JsValue> {
        let config = OceanConfig {
            start_frame: 0,
            vertices_x,
            vertices_y,
            width,
            length,
            height_scale,
            dt,
            alpha,
            sigma,
            wake_exponent,
        };
        let size = config.cell_count();
        let inner = Ocean::new(config, Box::new(StillWater), Vec::new())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Simulation {
            inner,
            ambient: vec![0.0; size],
            obstruction: vec![1.0; size],
            source: vec![0.0; size],
        })
    }

    // Inputs for the next update_fields (row-major, vertices_x * vertices_y)
    pub fn set_ambient(&mut self, ambient: Vec<f32>) -> Result<(), JsValue> {
        self.check("ambient", &ambient)?;
        self.ambient = ambient;
        Ok(())
    }

    pub fn set_obstruction(&mut self, obstruction: Vec<f32>) -> Result<(), JsValue> {
        self.check("obstruction", &obstruction)?;
        self.obstruction = obstruction;
        Ok(())
    }

    pub fn set_source(&mut self, source: Vec<f32>) -> Result<(), JsValue> {
        self.check("source", &source)?;
        self.source = source;
        Ok(())
    }

    /// Clears obstruction and source back to open, still water.
    pub fn clear_inputs(&mut self) {
        self.obstruction.fill(1.0);
        self.source.fill(0.0);
    }

    pub fn update_fields(&mut self) -> Result<(), JsValue> {
        self.inner
            .replace_fields(&self.ambient, &self.obstruction, &self.source)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn vertices_x(&self) -> usize { self.inner.dims().nx }
    pub fn vertices_y(&self) -> usize { self.inner.dims().ny }
    pub fn frame(&self) -> f64 { self.inner.frame() as f64 }

    // Copy-based JS access (reliable)
    pub fn get_height(&self) -> Vec<f32> {
        self.inner.snapshot().heights
    }

    pub fn get_obstruction(&self) -> Vec<f32> {
        self.inner.obstruction().to_vec()
    }

    // Step + timing (WASM-only)
    pub fn step(&mut self) -> StepInfo {
        let t0 = now_ms();
        self.inner.advance();
        let t1 = now_ms();
        StepInfo { frame: self.inner.frame() as f64, compute_ms: t1 - t0 }
    }
}

impl Simulation {
    fn check(&self, field: &'static str, values: &[f32]) -> Result<(), JsValue> {
        self.inner
            .check_field(field, values.len())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    frame: f64,
    compute_ms: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn frame(&self) -> f64 { self.frame }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
}


fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
