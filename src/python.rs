//! Python bindings, enabled with the `python` feature.
//!
//! Points cross the boundary as `(x, y)` tuples and obstacles as
//! `(x, y, radius)` triples. All construction errors surface as `ValueError`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::agent::{NavigationAgent, RunSummary};
use crate::config::NavigationConfig;
use crate::error::NavigationError;
use crate::scenario::Scenario;
use crate::structs::{self, FieldGains, Obstacle, Vec2};

fn to_py_err(err: NavigationError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn point(p: Vec2) -> (f64, f64) {
    (p.x, p.y)
}

#[pyclass(name = "NavigationAgent")]
pub struct PyNavigationAgent {
    inner: NavigationAgent,
}

#[pymethods]
impl PyNavigationAgent {
    #[new]
    #[pyo3(signature = (start, goal, obstacles, k_att=5.0, k_rep=100.0, rr=2.0, step_size=0.1, escape_enabled=false, config_json=None))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        start: (f64, f64),
        goal: (f64, f64),
        obstacles: Vec<(f64, f64, f64)>,
        k_att: f64,
        k_rep: f64,
        rr: f64,
        step_size: f64,
        escape_enabled: bool,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => NavigationConfig::from_json(json).map_err(to_py_err)?,
            None => NavigationConfig::default(),
        };
        let obstacles = obstacles
            .into_iter()
            .map(|(x, y, radius)| Obstacle::new(x, y, radius))
            .collect();
        let inner = NavigationAgent::new(
            Vec2::new(start.0, start.1),
            Vec2::new(goal.0, goal.1),
            obstacles,
            FieldGains::new(k_att, k_rep, rr),
            step_size,
            escape_enabled,
            config,
        )
        .map_err(to_py_err)?;
        Ok(PyNavigationAgent { inner })
    }

    fn advance(&mut self) {
        self.inner.advance();
    }

    /// Returns `(ticks, reached, escapes, path_length)`.
    fn run(&mut self, max_ticks: u64) -> (u64, bool, u32, f64) {
        let RunSummary {
            ticks,
            reached,
            escapes,
            path_length,
            ..
        } = self.inner.run(max_ticks);
        (ticks, reached, escapes, path_length)
    }

    #[getter]
    fn position(&self) -> (f64, f64) {
        point(self.inner.position())
    }

    #[getter]
    fn path(&self) -> Vec<(f64, f64)> {
        self.inner.path().iter().map(|p| point(*p)).collect()
    }

    #[getter]
    fn reached(&self) -> bool {
        self.inner.reached()
    }

    #[getter]
    fn mode(&self) -> &'static str {
        self.inner.mode().as_str()
    }

    #[getter]
    fn stuck_ticks(&self) -> u32 {
        self.inner.stuck_ticks()
    }

    #[getter]
    fn escape_ticks_remaining(&self) -> u32 {
        self.inner.escape_ticks_remaining()
    }

    #[getter]
    fn obstacles(&self) -> Vec<(f64, f64, f64)> {
        self.inner
            .field()
            .obstacles()
            .iter()
            .map(|o| (o.center.x, o.center.y, o.visual_radius))
            .collect()
    }

    fn __str__(&self) -> String {
        let p = self.inner.position();
        format!(
            "NavigationAgent(pos=({:.2}, {:.2}), mode={}, ticks={})",
            p.x,
            p.y,
            self.inner.mode().as_str(),
            self.inner.ticks()
        )
    }
}

#[pyfunction]
fn scenario_agent(name: &str) -> PyResult<PyNavigationAgent> {
    let scenario = Scenario::by_name(name)
        .ok_or_else(|| PyValueError::new_err(format!("unknown scenario: {name}")))?;
    let inner = scenario.build().map_err(to_py_err)?;
    Ok(PyNavigationAgent { inner })
}

#[pyfunction]
fn scenario_names() -> Vec<String> {
    Scenario::presets().into_iter().map(|s| s.name).collect()
}

#[pyfunction]
fn default_config_json() -> PyResult<String> {
    NavigationConfig::default().to_json().map_err(to_py_err)
}

#[pyfunction]
fn validate_config_json(config_json: &str) -> PyResult<bool> {
    NavigationConfig::from_json(config_json)
        .map(|_| true)
        .map_err(to_py_err)
}

#[pyfunction]
fn path_length(path: Vec<(f64, f64)>) -> f64 {
    let points: Vec<Vec2> = path.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
    structs::path_length(&points)
}

#[pymodule]
fn apf_navigation(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNavigationAgent>()?;

    m.add_function(wrap_pyfunction!(scenario_agent, m)?)?;
    m.add_function(wrap_pyfunction!(scenario_names, m)?)?;

    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    m.add_function(wrap_pyfunction!(validate_config_json, m)?)?;
    m.add_function(wrap_pyfunction!(path_length, m)?)?;

    Ok(())
}
