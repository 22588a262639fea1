//! Utilities.
use anyhow::{anyhow, Context, Result};
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
use log::trace;

/// Apply soft update on variables.
///
/// Variables are identified by their names.
///
/// dest = tau * src + (1.0 - tau) * dest
pub fn track(dest: &VarMap, src: &VarMap, tau: f64) -> Result<()> {
    trace!("track with tau = {}", tau);
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("Lock of target variables is poisoned"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("Lock of source variables is poisoned"))?;

    for (k_dest, v_dest) in dest.iter() {
        let v_src = src
            .get(k_dest)
            .with_context(|| format!("No variable {} in source", k_dest))?;
        let t_src = v_src.as_tensor();
        let t_dest = v_dest.as_tensor();
        let t_dest = ((tau * t_src)? + ((1.0 - tau) * t_dest)?)?;
        v_dest.set(&t_dest)?;
    }

    Ok(())
}

/// Stacks flat arrays into a `[batch_size, dim]` tensor.
pub fn stack_f32<T: AsRef<[f32]>>(xs: &[T], device: &Device) -> Result<Tensor> {
    let dim = xs.first().map(|x| x.as_ref().len()).unwrap_or(0);
    let data = xs
        .iter()
        .flat_map(|x| x.as_ref().iter().copied())
        .collect::<Vec<_>>();
    Ok(Tensor::from_vec(data, (xs.len(), dim), device)?)
}

/// Returns `1 - is_terminated` as a `[batch_size]` tensor.
///
/// Truncated transitions are bootstrapped as usual.
pub fn not_terminated(is_terminated: &[i8], device: &Device) -> Result<Tensor> {
    let v = is_terminated
        .iter()
        .map(|e| 1f32 - *e as f32)
        .collect::<Vec<_>>();
    Ok(Tensor::from_vec(v, (is_terminated.len(),), device)?)
}

/// Returns rewards as a `[batch_size]` tensor.
pub fn reward(reward: Vec<f32>, device: &Device) -> Result<Tensor> {
    let batch_size = reward.len();
    Ok(Tensor::from_vec(reward, (batch_size,), device)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::Init;

    #[test]
    fn test_track() -> Result<()> {
        let tau = 0.7;
        let t_src = Tensor::from_slice(&[1.0f32, 2.0, 3.0], (3,), &Device::Cpu)?;
        let t_dest = Tensor::from_slice(&[4.0f32, 5.0, 6.0], (3,), &Device::Cpu)?;
        let t = ((tau * &t_src)? + ((1.0 - tau) * &t_dest)?)?;

        let varmap = |t: &Tensor| -> Result<VarMap> {
            let vm = VarMap::new();
            let init = Init::Randn {
                mean: 0.0,
                stdev: 1.0,
            };
            vm.get((3,), "var1", init, DType::F32, &Device::Cpu)?;
            vm.data().lock().unwrap().get("var1").unwrap().set(t)?;
            Ok(vm)
        };
        let vm_src = varmap(&t_src)?;
        let vm_dest = varmap(&t_dest)?;
        track(&vm_dest, &vm_src, tau)?;

        let t_ = vm_dest
            .data()
            .lock()
            .unwrap()
            .get("var1")
            .unwrap()
            .as_tensor()
            .clone();
        assert!((t - t_)?.abs()?.sum(0)?.to_scalar::<f32>()? < 1e-6);

        Ok(())
    }

    #[test]
    fn test_stack_and_flags() -> Result<()> {
        let xs = vec![vec![1.0f32, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let t = stack_f32(&xs, &Device::Cpu)?;
        assert_eq!(t.dims(), &[3, 2]);
        assert_eq!(t.to_vec2::<f32>()?, xs);

        let t = not_terminated(&[0, 1, 0], &Device::Cpu)?;
        assert_eq!(t.to_vec1::<f32>()?, vec![1.0, 0.0, 1.0]);
        Ok(())
    }
}
