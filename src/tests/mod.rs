#[cfg(test)]
mod support;




#[cfg(test)]
mod test_interception;


#[cfg(test)]
mod test_overland;

#[cfg(test)]
mod test_channel;

#[cfg(test)]
mod test_flux;

#[cfg(test)]
mod test_balance;


#[cfg(test)]
mod test_bdf;
